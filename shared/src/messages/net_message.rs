use naia_serde::{
    BitReader, BitWrite, BitWriter, ConstBitLength, Serde, SerdeErr, UnsignedInteger,
};

use crate::{
    messages::{entity_update::EntityUpdate, rpc::Rpc, spawn::SpawnCommand},
    NetworkId,
};

/// Everything peers send each other over the session link.
#[derive(Clone, Debug, PartialEq)]
pub enum NetMessage {
    /// Periodic per-entity state broadcast
    EntityUpdate(EntityUpdate),
    Rpc(Rpc),
    Spawn(SpawnCommand),
    Despawn(NetworkId),
}

impl NetMessage {
    pub fn to_bytes(&self) -> Box<[u8]> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = BitReader::new(bytes);
        Self::de(&mut reader)
    }
}

impl Serde for NetMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            NetMessage::EntityUpdate(update) => {
                UnsignedInteger::<2>::new(0).ser(writer);
                update.ser(writer);
            }
            NetMessage::Rpc(rpc) => {
                UnsignedInteger::<2>::new(1).ser(writer);
                rpc.ser(writer);
            }
            NetMessage::Spawn(command) => {
                UnsignedInteger::<2>::new(2).ser(writer);
                command.ser(writer);
            }
            NetMessage::Despawn(entity) => {
                UnsignedInteger::<2>::new(3).ser(writer);
                entity.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(NetMessage::EntityUpdate(EntityUpdate::de(reader)?)),
            1 => Ok(NetMessage::Rpc(Rpc::de(reader)?)),
            2 => Ok(NetMessage::Spawn(SpawnCommand::de(reader)?)),
            3 => Ok(NetMessage::Despawn(NetworkId::de(reader)?)),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        let tag = <UnsignedInteger<2> as ConstBitLength>::const_bit_length();
        tag + match self {
            NetMessage::EntityUpdate(update) => update.bit_length(),
            NetMessage::Rpc(rpc) => rpc.bit_length(),
            NetMessage::Spawn(command) => command.bit_length(),
            NetMessage::Despawn(entity) => entity.bit_length(),
        }
    }
}
