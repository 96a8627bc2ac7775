use crate::{
    world::chain::{
        chain_state::NodeState,
        node_kind::{NodeBehavior, NodeKind},
        pose::Pose,
    },
    NetworkId,
};

/// One link of the train as seen by this peer.
#[derive(Clone, Debug)]
pub struct ChainNode {
    entity: NetworkId,
    state: NodeState,
    index: Option<usize>,
    kind: Option<NodeKind>,
    level: u8,
    pose: Pose,
    // Set once an observed registry has covered this node's index. Only
    // confirmed nodes are severed when a shorter registry is observed, so a
    // spawn that outruns its registry update survives.
    confirmed: bool,
}

impl ChainNode {
    pub fn floating(entity: NetworkId) -> Self {
        Self {
            entity,
            state: NodeState::Floating,
            index: None,
            kind: None,
            level: 0,
            pose: Pose::IDENTITY,
            confirmed: false,
        }
    }

    pub fn entity(&self) -> NetworkId {
        self.entity
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.kind
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn is_attached(&self) -> bool {
        self.state == NodeState::Attached
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn behavior(&self) -> Option<&'static dyn NodeBehavior> {
        self.kind.map(|kind| kind.behavior())
    }

    /// World pose of the rear socket the next node couples to.
    pub fn rear_pose(&self) -> Option<Pose> {
        let behavior = self.behavior()?;
        Some(self.pose.transform(&behavior.rear_offset(self.level)))
    }

    pub(crate) fn register(&mut self, index: usize, kind: NodeKind, level: u8) {
        self.index = Some(index);
        self.kind = Some(kind);
        self.level = level;
        if self.state == NodeState::Floating {
            self.state = NodeState::Registered;
        }
    }

    /// Returns true when this call moved the node into `Attached`.
    pub(crate) fn attach(&mut self, pose: Pose) -> bool {
        self.pose = pose;
        let newly_attached = self.state != NodeState::Attached;
        self.state = NodeState::Attached;
        newly_attached
    }

    pub(crate) fn sever(&mut self) {
        self.state = NodeState::Severed;
    }

    pub(crate) fn set_confirmed(&mut self, confirmed: bool) {
        self.confirmed = confirmed;
    }
}
