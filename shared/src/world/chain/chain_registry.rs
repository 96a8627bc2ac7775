use crate::{
    room::{
        PropertyUpdates, PropertyValue, RoomProperties, RoomPropertyError, CHAIN_LEVELS,
        CHAIN_TYPES,
    },
    world::chain::node_kind::NodeKind,
};

/// Persisted description of one chain slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    pub kind: NodeKind,
    pub level: u8,
}

impl RegistryEntry {
    pub fn new(kind: NodeKind, level: u8) -> Self {
        Self { kind, level }
    }
}

/// Encodes the registry as the two parallel room-property arrays. Both keys
/// are always written in the same batch.
pub fn registry_to_properties(entries: &[RegistryEntry]) -> PropertyUpdates {
    let types = entries.iter().map(|entry| entry.kind.code()).collect();
    let levels = entries.iter().map(|entry| i32::from(entry.level)).collect();
    vec![
        (CHAIN_TYPES.to_string(), PropertyValue::IntArray(types)),
        (CHAIN_LEVELS.to_string(), PropertyValue::IntArray(levels)),
    ]
}

/// Reads the persisted registry. `Ok(None)` means no registry has been
/// written yet.
pub fn registry_from_properties(
    room: &RoomProperties,
) -> Result<Option<Vec<RegistryEntry>>, RoomPropertyError> {
    let Some(types) = room.int_array(CHAIN_TYPES)? else {
        return Ok(None);
    };
    let levels = room.int_array(CHAIN_LEVELS)?.unwrap_or(&[]);

    if types.len() != levels.len() {
        return Err(RoomPropertyError::LengthMismatch {
            left: CHAIN_TYPES,
            left_len: types.len(),
            right: CHAIN_LEVELS,
            right_len: levels.len(),
        });
    }

    let mut entries = Vec::with_capacity(types.len());
    for (position, (code, level)) in types.iter().zip(levels.iter()).enumerate() {
        let kind = NodeKind::from_code(*code).ok_or_else(|| RoomPropertyError::InvalidValue {
            key: CHAIN_TYPES.to_string(),
            position,
            value: *code,
        })?;
        let level = u8::try_from(*level).map_err(|_| RoomPropertyError::InvalidValue {
            key: CHAIN_LEVELS.to_string(),
            position,
            value: *level,
        })?;
        entries.push(RegistryEntry { kind, level });
    }

    Ok(Some(entries))
}
