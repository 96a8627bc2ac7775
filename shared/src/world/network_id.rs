use std::fmt;

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::PeerId;

/// Session-wide identity of a replicated entity.
///
/// The upper 32 bits hold the creating peer, the lower 32 bits a counter
/// local to that peer, so ids minted on different peers never collide and
/// every peer addresses the same entity by the same value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(u64);

impl NetworkId {
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }

    pub fn creator(&self) -> PeerId {
        PeerId::new((self.0 >> 32) as u16)
    }

    pub fn counter(&self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Debug for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NetworkId({}:{})", self.creator().value(), self.counter())
    }
}

impl Serde for NetworkId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}

/// Mints [`NetworkId`]s for entities created on this peer.
pub struct NetworkIdGenerator {
    peer: PeerId,
    next: u32,
}

impl NetworkIdGenerator {
    pub fn new(peer: PeerId) -> Self {
        Self { peer, next: 0 }
    }

    pub fn generate(&mut self) -> NetworkId {
        let counter = self.next;
        self.next = self.next.wrapping_add(1);
        NetworkId((u64::from(self.peer.value()) << 32) | u64::from(counter))
    }
}
