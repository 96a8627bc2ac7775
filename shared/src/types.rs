use naia_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

pub type Tick = u16;
pub type ReservationId = u16;

/// Identifies one process taking part in a session. Assigned by the external
/// session layer and stable for the lifetime of the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(u16);

impl PeerId {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl Serde for PeerId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u16::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}

/// Who is allowed to decide outcomes for an entity, and who broadcasts its
/// replicated fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityOwner {
    /// Shared world object; whichever peer currently holds session authority
    /// decides for it.
    Authority,
    /// Self-owned object (e.g. a player-controlled character) decided by the
    /// controlling peer.
    Peer(PeerId),
}

impl Serde for EntityOwner {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            EntityOwner::Authority => false.ser(writer),
            EntityOwner::Peer(peer) => {
                true.ser(writer);
                peer.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(EntityOwner::Peer(PeerId::de(reader)?))
        } else {
            Ok(EntityOwner::Authority)
        }
    }

    fn bit_length(&self) -> u32 {
        match self {
            EntityOwner::Authority => false.bit_length(),
            EntityOwner::Peer(peer) => true.bit_length() + peer.bit_length(),
        }
    }
}

/// Cosmetic, network-visible events announced through `SpawnEffect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    MuzzleFlash,
    Impact,
    Explosion,
    Sparks,
}

impl Serde for EffectKind {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let index = match self {
            EffectKind::MuzzleFlash => 0,
            EffectKind::Impact => 1,
            EffectKind::Explosion => 2,
            EffectKind::Sparks => 3,
        };
        UnsignedInteger::<2>::new(index).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(EffectKind::MuzzleFlash),
            1 => Ok(EffectKind::Impact),
            2 => Ok(EffectKind::Explosion),
            3 => Ok(EffectKind::Sparks),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        <UnsignedInteger<2> as ConstBitLength>::const_bit_length()
    }
}
