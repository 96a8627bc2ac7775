pub mod assertions;
pub mod test_session;

pub use test_session::{count_events, drain, TestPeer, TestSession, INVENTORY_SLOTS};
