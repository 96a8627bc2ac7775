use thiserror::Error;

use crate::ReservationId;

/// Errors that can occur while predicting socket interactions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    /// The socket already has an interaction awaiting confirmation
    #[error("Socket {socket} of node {entity_id} is locked by a pending interaction")]
    SlotPending { entity_id: String, socket: u8 },

    /// The node has fewer sockets than the index requested
    #[error("Socket index {socket} is out of range for a node with {count} sockets")]
    SocketOutOfRange { socket: u8, count: usize },

    /// The item name contains the character that separates persisted sockets
    #[error("Item '{item}' contains the socket delimiter '{delimiter}'")]
    InvalidItemName { item: String, delimiter: char },

    /// Both the socket and the inventory slot are empty
    #[error("Neither the socket nor the inventory slot holds an item")]
    NothingToExchange,

    /// The inventory has fewer slots than the index requested
    #[error("Inventory slot {slot} is out of range for an inventory of {count} slots")]
    InventorySlotOutOfRange { slot: usize, count: usize },

    /// The inventory slot is already tied to another pending interaction
    #[error("Inventory slot {slot} is already reserved")]
    InventorySlotReserved { slot: usize },

    /// No reservation with this id is outstanding
    #[error("No outstanding inventory reservation {reservation}")]
    UnknownReservation { reservation: ReservationId },

    /// The entity has no sockets registered
    #[error("Entity {entity_id} has no registered sockets")]
    UnknownNode { entity_id: String },
}
