use crate::Tick;

/// Contains Config properties which will be used by the prediction engine
#[derive(Clone, Debug, Default)]
pub struct PredictionConfig {
    /// Roll back a pending interaction after this many ticks without a
    /// matching broadcast. `None` keeps it pending until a broadcast, a
    /// disconnect or the node's despawn resolves it.
    pub pending_timeout: Option<Tick>,
}
