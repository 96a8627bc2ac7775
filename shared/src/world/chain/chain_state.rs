/// Lifecycle of a chain node on one peer.
///
/// `Floating` → `Registered` → `Attached` → `Severed`. A node only moves
/// forward; `Severed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Created, attributes not yet known
    Floating,
    /// Index, kind and level known; waiting for its predecessor
    Registered,
    /// Pose fixed relative to the predecessor's rear socket
    Attached,
    /// Removed from the registry
    Severed,
}

impl NodeState {
    pub fn is_registered(&self) -> bool {
        matches!(self, NodeState::Registered | NodeState::Attached)
    }
}
