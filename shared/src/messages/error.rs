use thiserror::Error;

/// Errors that can occur while routing remote procedure calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// No handler is registered under the RPC's name
    #[error("No handler registered for RPC '{name}'")]
    UnknownRpc { name: &'static str },

    /// A handler is already registered under this name
    #[error("A handler for RPC '{name}' is already registered")]
    DuplicateHandler { name: &'static str },

    /// The bytes received could not be decoded into a message
    #[error("Received a message from peer {from} that could not be decoded")]
    Malformed { from: u16 },
}
