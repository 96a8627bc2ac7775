use std::default::Default;

use convoy_shared::{ChainConfig, PredictionConfig, ReplicationConfig};

/// Contains Config properties which will be used by a Peer
#[derive(Clone, Debug)]
pub struct PeerConfig {
    /// Periodic broadcast settings for entities this peer owns
    pub replication: ReplicationConfig,
    /// Chain origin, length limit and socket string format
    pub chain: ChainConfig,
    /// Caller-side handling of pending socket interactions
    pub prediction: PredictionConfig,
    /// Idle instances built per pooled prefab when the peer starts
    pub pool_prewarm: usize,
    /// Idle instances kept per pooled prefab; surplus despawns are dropped
    pub pool_max_idle: usize,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            replication: ReplicationConfig::default(),
            chain: ChainConfig::default(),
            prediction: PredictionConfig::default(),
            pool_prewarm: 0,
            pool_max_idle: 16,
        }
    }
}
