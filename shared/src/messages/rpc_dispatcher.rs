use std::collections::HashMap;

use crate::{messages::error::RpcError, messages::rpc::Rpc, PeerId};

/// Handler invoked with the receiving context, the sender and the call.
pub type RpcHandler<C> = fn(&mut C, PeerId, Rpc);

/// Routes a decoded RPC to the handler registered under its name.
pub struct RpcDispatcher<C> {
    handlers: HashMap<&'static str, RpcHandler<C>>,
}

impl<C> RpcDispatcher<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, handler: RpcHandler<C>) -> Result<(), RpcError> {
        if self.handlers.contains_key(name) {
            return Err(RpcError::DuplicateHandler { name });
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn handler(&self, name: &str) -> Option<RpcHandler<C>> {
        self.handlers.get(name).copied()
    }

    /// Calls the handler for `rpc` on `context`.
    pub fn dispatch(&self, context: &mut C, from: PeerId, rpc: Rpc) -> Result<(), RpcError> {
        let name = rpc.name();
        let handler = self.handler(name).ok_or(RpcError::UnknownRpc { name })?;
        handler(context, from, rpc);
        Ok(())
    }
}

impl<C> Default for RpcDispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}
