mod diff_mask;
mod error;
mod health;
mod mut_channel;
mod property;
mod replicate;
mod replication_channel;
mod replication_config;

pub use diff_mask::DiffMask;
pub use error::ReplicationError;
pub use health::{DamageOutcome, Health, HEALTH_CURRENT, HEALTH_DEAD, HEALTH_MAX};
pub use mut_channel::{MutChannel, MutReceiver, PropertyMutator};
pub use property::Property;
pub use replicate::Replicate;
pub use replication_channel::{ReceiveOutcome, ReplicationChannel};
pub use replication_config::ReplicationConfig;
