use thiserror::Error;

use crate::room::RoomPropertyError;

/// Errors that can occur while maintaining the train chain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The index lies outside the current registry
    #[error("Chain index {index} is out of range for a chain of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The entity is not tracked as a chain node
    #[error("Entity {entity_id} is not a tracked chain node")]
    UnknownNode { entity_id: String },

    /// The entity is already tracked, or already registered at another index
    #[error("Entity {entity_id} is already registered at chain index {index}")]
    DuplicateRegistration { entity_id: String, index: usize },

    /// The node has been cut from the chain and can no longer be addressed
    #[error("Chain node {entity_id} has been severed")]
    NodeSevered { entity_id: String },

    /// Appending would exceed the configured chain length
    #[error("Chain is full ({max_length} nodes)")]
    ChainFull { max_length: usize },

    /// Structural chain changes may only be made by the authority
    #[error("Peer without authority attempted to change the chain structure")]
    NotAuthority,

    /// The persisted registry could not be read or written
    #[error(transparent)]
    RoomProperty(#[from] RoomPropertyError),
}
