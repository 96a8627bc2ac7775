pub mod authority;
pub mod chain;
pub mod net_entity;
pub mod network_id;
pub mod pool;
pub mod prediction;
pub mod prefab;
pub mod replication;
