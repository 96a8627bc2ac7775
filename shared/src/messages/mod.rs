mod entity_update;
mod error;
mod net_message;
mod rpc;
mod rpc_dispatcher;
mod spawn;

pub use entity_update::EntityUpdate;
pub use error::RpcError;
pub use net_message::NetMessage;
pub use rpc::{Rpc, RpcTarget};
pub use rpc_dispatcher::{RpcDispatcher, RpcHandler};
pub use spawn::{SpawnCommand, SpawnPayload};
