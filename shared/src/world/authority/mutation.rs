use crate::{
    world::prediction::{PredictionError, SocketSlots},
    DamageOutcome, Health, NetworkId, ReservationId, Rpc,
};

/// A change to entity state that only the deciding peer may apply.
pub trait Mutation {
    type Target: ?Sized;
    type Outcome;

    /// Runs the change against the deciding peer's state.
    fn apply(&self, target: &mut Self::Target) -> Self::Outcome;

    /// The request a non-deciding peer sends instead.
    fn to_request(&self) -> Rpc;
}

/// Subtract health from an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Damage {
    pub entity: NetworkId,
    pub amount: u32,
}

impl Mutation for Damage {
    type Target = Health;
    type Outcome = DamageOutcome;

    fn apply(&self, target: &mut Health) -> DamageOutcome {
        target.apply_damage(self.amount)
    }

    fn to_request(&self) -> Rpc {
        Rpc::RequestDamage {
            entity: self.entity,
            amount: self.amount,
        }
    }
}

/// Exchange an item between a peer's inventory and a node's socket.
/// `outgoing` is what the requester believes the socket holds now; the
/// authority only commits when that still matches its own truth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocketInteract {
    pub node: NetworkId,
    pub socket: u8,
    pub incoming: String,
    pub outgoing: String,
    pub reservation: ReservationId,
}

impl Mutation for SocketInteract {
    type Target = SocketSlots;
    type Outcome = Result<bool, PredictionError>;

    fn apply(&self, target: &mut SocketSlots) -> Self::Outcome {
        target.apply_authoritative(self.socket, &self.incoming, &self.outgoing)
    }

    fn to_request(&self) -> Rpc {
        Rpc::RequestSocketInteract {
            node: self.node,
            socket: self.socket,
            incoming: self.incoming.clone(),
            outgoing: self.outgoing.clone(),
            reservation: self.reservation,
        }
    }
}
