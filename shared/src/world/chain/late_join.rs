use log::info;

use crate::{
    room::{RoomProperties, CHAIN_TYPES},
    world::chain::{chain_registry::RegistryEntry, chain_topology::ChainTopology},
    AuthorityResolver,
};

/// What a joining peer should do this tick to rebuild the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LateJoinStep {
    /// No authority here and no persisted registry yet
    Waiting,
    /// This peer is authority and must spawn these entries itself
    SpawnMissing(Vec<(usize, RegistryEntry)>),
    /// The chain now holds every node the registry declares
    Complete { node_count: usize },
    /// Reconstruction finished on an earlier tick
    Idle,
}

/// Rebuilds the chain on a peer that joined an ongoing session, from the
/// persisted registry alone.
#[derive(Debug, Default)]
pub struct LateJoin {
    complete: bool,
}

impl LateJoin {
    pub fn new() -> Self {
        Self { complete: false }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Checked once per tick until it reports `Complete`.
    pub fn poll(
        &mut self,
        authority: &AuthorityResolver,
        room: &RoomProperties,
        topology: &ChainTopology,
    ) -> LateJoinStep {
        if self.complete {
            return LateJoinStep::Idle;
        }

        let has_registry = room.contains(CHAIN_TYPES);
        if !authority.is_authority() && !has_registry {
            return LateJoinStep::Waiting;
        }

        let missing = topology.missing_indices();
        if missing.is_empty() {
            self.complete = true;
            let node_count = topology.len();
            info!("LateJoin: chain reconstructed with {} nodes", node_count);
            return LateJoinStep::Complete { node_count };
        }

        if authority.is_authority() {
            let registry = topology.registry();
            let entries = missing
                .into_iter()
                .filter_map(|index| registry.get(index).map(|entry| (index, *entry)))
                .collect();
            return LateJoinStep::SpawnMissing(entries);
        }

        LateJoinStep::Waiting
    }
}
