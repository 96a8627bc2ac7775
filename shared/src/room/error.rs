use thiserror::Error;

/// Errors raised while reading or writing the session's durable room
/// properties
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomPropertyError {
    /// Only the authority may write room properties
    #[error("Peer without authority attempted to write room property '{key}'")]
    NotAuthority { key: String },

    /// A property held a different value type than the reader expected
    #[error("Room property '{key}' holds {actual}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Two parallel arrays that must always be written together disagree in length
    #[error("Room properties '{left}' ({left_len}) and '{right}' ({right_len}) have different lengths")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    /// A persisted value could not be decoded into its domain type
    #[error("Room property '{key}' holds an invalid value at position {position}: {value}")]
    InvalidValue {
        key: String,
        position: usize,
        value: i32,
    },
}
