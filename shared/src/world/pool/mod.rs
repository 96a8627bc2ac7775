mod entity_pool;
mod error;
mod pool_registry;
mod poolable;

pub use entity_pool::{EntityPool, PoolStats};
pub use error::PoolError;
pub use pool_registry::{DespawnOutcome, PoolRegistry};
pub use poolable::Poolable;
