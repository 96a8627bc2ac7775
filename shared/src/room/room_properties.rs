use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    room::{error::RoomPropertyError, property_value::PropertyValue},
    world::authority::AuthorityResolver,
};

pub type PropertyUpdates = Vec<(String, PropertyValue)>;

/// Local mirror of the session's durable key-value store.
///
/// Single writer, many readers: every peer may read at any time, only the
/// authority may write, and every write is a whole-value overwrite. Writes
/// made during one tick are staged together and flushed to the session layer
/// as one batch, which is what makes multi-key updates (such as the two
/// parallel chain arrays) atomic for observers.
pub struct RoomProperties {
    values: HashMap<String, PropertyValue>,
    staged: PropertyUpdates,
}

impl RoomProperties {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            staged: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn int_array(&self, key: &str) -> Result<Option<&[i32]>, RoomPropertyError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(PropertyValue::IntArray(values)) => Ok(Some(values)),
            Some(other) => Err(RoomPropertyError::TypeMismatch {
                key: key.to_string(),
                expected: "IntArray",
                actual: other.type_name(),
            }),
        }
    }

    pub fn text(&self, key: &str) -> Result<Option<&str>, RoomPropertyError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(PropertyValue::Text(text)) => Ok(Some(text)),
            Some(other) => Err(RoomPropertyError::TypeMismatch {
                key: key.to_string(),
                expected: "Text",
                actual: other.type_name(),
            }),
        }
    }

    /// Writes a batch of properties as the authority. The batch is applied to
    /// the local mirror immediately and staged for the next flush. A peer
    /// without authority has the whole batch refused.
    ///
    /// Returns the keys whose value actually changed.
    pub fn write(
        &mut self,
        authority: &AuthorityResolver,
        updates: PropertyUpdates,
    ) -> Result<Vec<String>, RoomPropertyError> {
        if !authority.is_authority() {
            let key = updates
                .first()
                .map(|(key, _)| key.clone())
                .unwrap_or_default();
            warn!("RoomProperties: refusing write of '{}' from non-authority", key);
            return Err(RoomPropertyError::NotAuthority { key });
        }

        let mut changed = Vec::new();
        for (key, value) in updates {
            if self.values.get(&key) != Some(&value) {
                changed.push(key.clone());
            }
            self.values.insert(key.clone(), value.clone());
            self.staged.retain(|(staged_key, _)| *staged_key != key);
            self.staged.push((key, value));
        }

        Ok(changed)
    }

    pub fn has_staged(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Drains everything written since the last flush, to be handed to the
    /// session layer as a single batch.
    pub fn take_staged(&mut self) -> PropertyUpdates {
        std::mem::take(&mut self.staged)
    }

    /// Applies a batch observed from the session layer. Values identical to
    /// the cached ones are not reported.
    pub fn apply_remote(&mut self, updates: PropertyUpdates) -> Vec<String> {
        let mut changed = Vec::new();
        for (key, value) in updates {
            if self.values.get(&key) == Some(&value) {
                debug!("RoomProperties: '{}' unchanged, suppressing", key);
                continue;
            }
            self.values.insert(key.clone(), value);
            changed.push(key);
        }
        changed
    }
}

impl Default for RoomProperties {
    fn default() -> Self {
        Self::new()
    }
}
