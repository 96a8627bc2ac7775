use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{NetworkId, Tick};

/// One entity's declared field set, as broadcast by its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityUpdate {
    pub entity: NetworkId,
    /// Owner's tick at send time; observers drop anything older than the
    /// newest update they mirrored.
    pub tick: Tick,
    /// Every declared field in index order, bit-packed.
    pub fields: Vec<u8>,
}

impl Serde for EntityUpdate {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity.ser(writer);
        self.tick.ser(writer);
        self.fields.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            entity: NetworkId::de(reader)?,
            tick: Tick::de(reader)?,
            fields: Vec::<u8>::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.entity.bit_length() + self.tick.bit_length() + self.fields.bit_length()
    }
}
