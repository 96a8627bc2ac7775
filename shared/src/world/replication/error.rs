use thiserror::Error;

/// Errors that can occur while broadcasting or mirroring replicated fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    /// An update referenced a field index the component never declared
    #[error("Field index {index} out of range for component with {field_count} fields")]
    FieldOutOfRange { index: u8, field_count: u8 },

    /// A field value could not be decoded from an update payload
    #[error("Malformed update for entity {entity_id}: could not read field {index}")]
    MalformedUpdate { entity_id: String, index: u8 },

    /// The entity is already registered for outgoing broadcasts
    #[error("Entity {entity_id} is already registered as owned")]
    AlreadyOwned { entity_id: String },

    /// The diff mask lock is poisoned (a panic occurred while it was held)
    #[error("Diff mask lock is poisoned - a panic occurred while holding the lock")]
    MaskLockPoisoned,
}
