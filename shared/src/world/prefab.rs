use naia_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

use crate::world::chain::NodeKind;

/// What kind of world object a spawn creates. Pools are keyed by prefab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prefab {
    Node(NodeKind),
    Enemy,
    /// Session-scoped character; never pooled.
    Player,
}

impl Prefab {
    pub fn node_kind(&self) -> Option<NodeKind> {
        match self {
            Prefab::Node(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl Serde for Prefab {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Prefab::Node(kind) => {
                UnsignedInteger::<2>::new(0).ser(writer);
                kind.ser(writer);
            }
            Prefab::Enemy => UnsignedInteger::<2>::new(1).ser(writer),
            Prefab::Player => UnsignedInteger::<2>::new(2).ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(Prefab::Node(NodeKind::de(reader)?)),
            1 => Ok(Prefab::Enemy),
            2 => Ok(Prefab::Player),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        let tag = <UnsignedInteger<2> as ConstBitLength>::const_bit_length();
        match self {
            Prefab::Node(kind) => tag + kind.bit_length(),
            _ => tag,
        }
    }
}
