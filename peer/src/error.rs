use thiserror::Error;

use convoy_shared::{
    ChainError, PoolError, PredictionError, ReplicationError, RoomPropertyError, RpcError,
};

/// Errors returned by [`Peer`](crate::Peer) operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PeerError {
    /// The entity is not live on this peer
    #[error("Entity {entity_id} does not exist on this peer")]
    UnknownEntity { entity_id: String },

    /// The operation may only be performed by the peer deciding for the entity
    #[error("Only the deciding peer may {operation}")]
    NotAuthority { operation: &'static str },

    /// The entity exists but is not part of the chain
    #[error("Entity {entity_id} is not a registered chain node")]
    NotANode { entity_id: String },

    /// The node's kind has no attack
    #[error("Chain node {entity_id} cannot attack")]
    CannotAttack { entity_id: String },

    /// The peer has left the session
    #[error("Peer is disconnected from the session")]
    Disconnected,

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Replication(#[from] ReplicationError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    RoomProperty(#[from] RoomPropertyError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}
