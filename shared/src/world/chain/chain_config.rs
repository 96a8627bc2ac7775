use crate::world::chain::pose::Pose;

/// Contains Config properties which will be used by the chain topology
#[derive(Clone, Debug)]
pub struct ChainConfig {
    /// World pose of the node at index 0
    pub origin: Pose,
    /// Appends beyond this many nodes are refused
    pub max_length: usize,
    /// Separator between item names in a persisted socket string
    pub socket_delimiter: char,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            origin: Pose::IDENTITY,
            max_length: 32,
            socket_delimiter: ',',
        }
    }
}
