use thiserror::Error;

/// Errors that can occur while acquiring or releasing pooled instances
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No pool is registered for the prefab
    #[error("No pool registered for prefab {prefab}")]
    UnknownPrefab { prefab: String },

    /// A pool for the prefab is already registered
    #[error("A pool for prefab {prefab} is already registered")]
    DuplicatePool { prefab: String },

    /// The entity id is already live
    #[error("Entity {entity_id} is already live")]
    AlreadyLive { entity_id: String },

    /// The instance was released before, or never acquired
    #[error("Entity {entity_id} is not live (already released?)")]
    NotLive { entity_id: String },
}
