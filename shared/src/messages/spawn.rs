use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{world::chain::NodeKind, EntityOwner, NetworkId, Prefab};

/// Creation arguments consumed once, when the instance is first handed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPayload {
    pub index: u16,
    pub level: u8,
    pub kind: NodeKind,
}

impl Serde for SpawnPayload {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.index.ser(writer);
        self.level.ser(writer);
        self.kind.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            index: u16::de(reader)?,
            level: u8::de(reader)?,
            kind: NodeKind::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.index.bit_length() + self.level.bit_length() + self.kind.bit_length()
    }
}

/// Network creation request for one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnCommand {
    pub entity: NetworkId,
    pub prefab: Prefab,
    pub owner: EntityOwner,
    pub payload: Option<SpawnPayload>,
}

impl Serde for SpawnCommand {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity.ser(writer);
        self.prefab.ser(writer);
        self.owner.ser(writer);
        self.payload.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity: NetworkId::de(reader)?,
            prefab: Prefab::de(reader)?,
            owner: EntityOwner::de(reader)?,
            payload: Option::<SpawnPayload>::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.entity.bit_length()
            + self.prefab.bit_length()
            + self.owner.bit_length()
            + self.payload.bit_length()
    }
}
