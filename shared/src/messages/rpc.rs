use naia_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

use crate::{world::chain::Pose, EffectKind, NetworkId, ReservationId};

/// Who an RPC is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpcTarget {
    Authority,
    All,
}

/// Named remote procedure calls. None of them has a reply.
#[derive(Clone, Debug, PartialEq)]
pub enum Rpc {
    /// Ask the authority to subtract health from an entity.
    RequestDamage { entity: NetworkId, amount: u32 },
    /// The authority announces an entity's health reached zero.
    ConfirmDeath { entity: NetworkId },
    /// Ask the authority to exchange an item with a node's socket.
    RequestSocketInteract {
        node: NetworkId,
        socket: u8,
        incoming: String,
        outgoing: String,
        reservation: ReservationId,
    },
    /// A cosmetic event every peer plays.
    SpawnEffect { effect: EffectKind, pose: Pose },
}

impl Rpc {
    pub const REQUEST_DAMAGE: &'static str = "requestDamage";
    pub const CONFIRM_DEATH: &'static str = "confirmDeath";
    pub const REQUEST_SOCKET_INTERACT: &'static str = "requestSocketInteract";
    pub const SPAWN_EFFECT: &'static str = "spawnEffect";

    pub fn name(&self) -> &'static str {
        match self {
            Rpc::RequestDamage { .. } => Self::REQUEST_DAMAGE,
            Rpc::ConfirmDeath { .. } => Self::CONFIRM_DEATH,
            Rpc::RequestSocketInteract { .. } => Self::REQUEST_SOCKET_INTERACT,
            Rpc::SpawnEffect { .. } => Self::SPAWN_EFFECT,
        }
    }

    pub fn target(&self) -> RpcTarget {
        match self {
            Rpc::RequestDamage { .. } | Rpc::RequestSocketInteract { .. } => RpcTarget::Authority,
            Rpc::ConfirmDeath { .. } | Rpc::SpawnEffect { .. } => RpcTarget::All,
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Rpc::RequestDamage { .. } => 0,
            Rpc::ConfirmDeath { .. } => 1,
            Rpc::RequestSocketInteract { .. } => 2,
            Rpc::SpawnEffect { .. } => 3,
        }
    }
}

impl Serde for Rpc {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<2>::new(self.tag()).ser(writer);
        match self {
            Rpc::RequestDamage { entity, amount } => {
                entity.ser(writer);
                amount.ser(writer);
            }
            Rpc::ConfirmDeath { entity } => entity.ser(writer),
            Rpc::RequestSocketInteract {
                node,
                socket,
                incoming,
                outgoing,
                reservation,
            } => {
                node.ser(writer);
                socket.ser(writer);
                incoming.ser(writer);
                outgoing.ser(writer);
                reservation.ser(writer);
            }
            Rpc::SpawnEffect { effect, pose } => {
                effect.ser(writer);
                pose.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match UnsignedInteger::<2>::de(reader)?.get() {
            0 => Ok(Rpc::RequestDamage {
                entity: NetworkId::de(reader)?,
                amount: u32::de(reader)?,
            }),
            1 => Ok(Rpc::ConfirmDeath {
                entity: NetworkId::de(reader)?,
            }),
            2 => Ok(Rpc::RequestSocketInteract {
                node: NetworkId::de(reader)?,
                socket: u8::de(reader)?,
                incoming: String::de(reader)?,
                outgoing: String::de(reader)?,
                reservation: ReservationId::de(reader)?,
            }),
            3 => Ok(Rpc::SpawnEffect {
                effect: EffectKind::de(reader)?,
                pose: Pose::de(reader)?,
            }),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        let tag = <UnsignedInteger<2> as ConstBitLength>::const_bit_length();
        tag + match self {
            Rpc::RequestDamage { entity, amount } => entity.bit_length() + amount.bit_length(),
            Rpc::ConfirmDeath { entity } => entity.bit_length(),
            Rpc::RequestSocketInteract {
                node,
                socket,
                incoming,
                outgoing,
                reservation,
            } => {
                node.bit_length()
                    + socket.bit_length()
                    + incoming.bit_length()
                    + outgoing.bit_length()
                    + reservation.bit_length()
            }
            Rpc::SpawnEffect { effect, pose } => effect.bit_length() + pose.bit_length(),
        }
    }
}
