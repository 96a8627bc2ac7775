mod error;
mod inventory;
mod prediction_config;
mod prediction_engine;
mod socket_slot;

pub use error::PredictionError;
pub use inventory::{Inventory, SlotInventory};
pub use prediction_config::PredictionConfig;
pub use prediction_engine::{PredictionEngine, PredictionEvent};
pub use socket_slot::{PendingInteraction, SocketSlot, SocketSlots};
