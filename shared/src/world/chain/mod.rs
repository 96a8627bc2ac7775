mod chain_config;
mod chain_node;
mod chain_registry;
mod chain_state;
mod chain_topology;
mod error;
mod late_join;
mod node_kind;
mod pose;

pub use chain_config::ChainConfig;
pub use chain_node::ChainNode;
pub use chain_registry::{registry_from_properties, registry_to_properties, RegistryEntry};
pub use chain_state::NodeState;
pub use chain_topology::{ChainEvent, ChainTopology};
pub use error::ChainError;
pub use late_join::{LateJoin, LateJoinStep};
pub use node_kind::{
    CargoNode, EngineNode, NodeBehavior, NodeKind, NodeStats, RadarNode, TurretNode,
};
pub use pose::Pose;
