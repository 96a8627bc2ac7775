use std::collections::{HashMap, VecDeque};

use log::{debug, info, warn};

use crate::{
    room::{socket_key, PropertyValue, RoomProperties},
    world::chain::{
        chain_config::ChainConfig,
        chain_node::ChainNode,
        chain_registry::{registry_from_properties, registry_to_properties, RegistryEntry},
        chain_state::NodeState,
        error::ChainError,
        node_kind::NodeKind,
        pose::Pose,
    },
    AuthorityResolver, NetworkId,
};

/// Structural change reported by [`ChainTopology`].
#[derive(Clone, Debug, PartialEq)]
pub enum ChainEvent {
    Registered { entity: NetworkId, index: usize },
    Attached { entity: NetworkId, index: usize, pose: Pose },
    Severed { entity: NetworkId, index: Option<usize> },
}

/// Ordered train of chain nodes.
///
/// The registry is the local view of the persisted `chain_types` /
/// `chain_levels` arrays; nodes are the entities that have actually arrived
/// on this peer. The two may briefly disagree in either direction because
/// spawns and room-property updates travel on unordered streams, so every
/// pass tolerates a node without a registry entry and an entry without a
/// node.
pub struct ChainTopology {
    config: ChainConfig,
    registry: Vec<RegistryEntry>,
    nodes: HashMap<NetworkId, ChainNode>,
    by_index: HashMap<usize, NetworkId>,
    events: VecDeque<ChainEvent>,
}

impl ChainTopology {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            registry: Vec::new(),
            nodes: HashMap::new(),
            by_index: HashMap::new(),
            events: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Length of the registry as last written or observed.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn registry(&self) -> &[RegistryEntry] {
        &self.registry
    }

    pub fn node(&self, entity: &NetworkId) -> Option<&ChainNode> {
        self.nodes.get(entity)
    }

    pub fn node_at(&self, index: usize) -> Option<&ChainNode> {
        self.by_index
            .get(&index)
            .and_then(|entity| self.nodes.get(entity))
    }

    pub fn entity_at(&self, index: usize) -> Option<NetworkId> {
        self.by_index.get(&index).copied()
    }

    pub fn index_of(&self, entity: &NetworkId) -> Option<usize> {
        self.nodes
            .get(entity)
            .filter(|node| node.state().is_registered())
            .and_then(|node| node.index())
    }

    /// The node immediately ahead (closer to index 0).
    pub fn predecessor(&self, entity: &NetworkId) -> Option<NetworkId> {
        let index = self.index_of(entity)?;
        index.checked_sub(1).and_then(|ahead| self.entity_at(ahead))
    }

    /// The node immediately behind.
    pub fn successor(&self, entity: &NetworkId) -> Option<NetworkId> {
        let index = self.index_of(entity)?;
        self.entity_at(index + 1)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ChainNode> {
        self.nodes.values()
    }

    pub fn contains(&self, entity: &NetworkId) -> bool {
        self.nodes.contains_key(entity)
    }

    /// Registry indices with no node present on this peer yet.
    pub fn missing_indices(&self) -> Vec<usize> {
        (0..self.registry.len())
            .filter(|index| !self.by_index.contains_key(index))
            .collect()
    }

    /// True when every registry index holds an attached node.
    pub fn is_fully_attached(&self) -> bool {
        (0..self.registry.len()).all(|index| {
            self.node_at(index)
                .map(|node| node.is_attached())
                .unwrap_or(false)
        })
    }

    pub fn take_events(&mut self) -> VecDeque<ChainEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts tracking an entity whose chain attributes are not known yet.
    pub fn track(&mut self, entity: NetworkId) -> Result<(), ChainError> {
        if self.nodes.contains_key(&entity) {
            return Err(ChainError::DuplicateRegistration {
                entity_id: format!("{:?}", entity),
                index: self.index_of(&entity).unwrap_or_default(),
            });
        }
        self.nodes.insert(entity, ChainNode::floating(entity));
        Ok(())
    }

    /// Gives a node its index, kind and level, then runs an alignment pass.
    ///
    /// Untracked entities are tracked first. Registering the same node again
    /// at the same index is a no-op. If another node still occupies the
    /// index, that node belongs to a cut this peer has not observed yet and
    /// is superseded.
    pub fn register(
        &mut self,
        entity: NetworkId,
        index: usize,
        kind: NodeKind,
        level: u8,
    ) -> Result<(), ChainError> {
        if !self.nodes.contains_key(&entity) {
            self.track(entity)?;
        }

        let confirmed = index < self.registry.len();
        let Some(node) = self.nodes.get(&entity) else {
            return Err(ChainError::UnknownNode {
                entity_id: format!("{:?}", entity),
            });
        };
        if node.state() == NodeState::Severed {
            return Err(ChainError::NodeSevered {
                entity_id: format!("{:?}", entity),
            });
        }
        if let Some(existing) = node.index().filter(|_| node.state().is_registered()) {
            if existing == index {
                return Ok(());
            }
            return Err(ChainError::DuplicateRegistration {
                entity_id: format!("{:?}", entity),
                index: existing,
            });
        }

        if let Some(occupant) = self.by_index.get(&index).copied() {
            warn!(
                "ChainTopology: {:?} supersedes {:?} at index {}",
                entity, occupant, index
            );
            self.sever_node(&occupant);
        }

        if let Some(node) = self.nodes.get_mut(&entity) {
            node.register(index, kind, level);
            node.set_confirmed(confirmed);
        }
        self.by_index.insert(index, entity);
        info!(
            "ChainTopology: registered {:?} as {:?} level {} at index {}",
            entity, kind, level, index
        );
        self.events.push_back(ChainEvent::Registered { entity, index });

        self.align();
        Ok(())
    }

    /// Walks the registry front to back and attaches every node whose
    /// predecessor is attached. Nodes behind a gap are left for a later
    /// pass. Returns how many nodes became attached.
    pub fn align(&mut self) -> usize {
        let mut newly_attached = 0;
        let mut anchor = Some(self.config.origin);

        for index in 0..self.registry.len() {
            let current_anchor = anchor.take();

            let Some(entity) = self.by_index.get(&index).copied() else {
                continue;
            };
            let Some(node) = self.nodes.get_mut(&entity) else {
                continue;
            };
            let Some(pose) = current_anchor else {
                debug!(
                    "ChainTopology: {:?} at index {} waits for its predecessor",
                    entity, index
                );
                continue;
            };

            if node.attach(pose) {
                newly_attached += 1;
                info!("ChainTopology: attached {:?} at index {}", entity, index);
                self.events.push_back(ChainEvent::Attached {
                    entity,
                    index,
                    pose,
                });
            }
            anchor = node.rear_pose();
        }

        newly_attached
    }

    /// Appends a registry entry as the authority and persists the registry.
    /// Returns the new node's index; the caller spawns the entity and
    /// registers it.
    pub fn append(
        &mut self,
        authority: &AuthorityResolver,
        room: &mut RoomProperties,
        kind: NodeKind,
        level: u8,
    ) -> Result<usize, ChainError> {
        if !authority.is_authority() {
            return Err(ChainError::NotAuthority);
        }
        if self.registry.len() >= self.config.max_length {
            return Err(ChainError::ChainFull {
                max_length: self.config.max_length,
            });
        }

        let index = self.registry.len();
        let mut entries = self.registry.clone();
        entries.push(RegistryEntry::new(kind, level));

        let mut updates = registry_to_properties(&entries);
        if kind.behavior().stats(level).socket_count > 0 {
            updates.push((socket_key(index), PropertyValue::Text(String::new())));
        }
        room.write(authority, updates)?;

        self.registry = entries;
        Ok(index)
    }

    /// Removes the node at `index` and everything behind it as the
    /// authority. The shortened registry and the cleared socket strings are
    /// persisted in one batch. Returns the severed entities, front to back.
    pub fn cut_tail(
        &mut self,
        authority: &AuthorityResolver,
        room: &mut RoomProperties,
        index: usize,
    ) -> Result<Vec<NetworkId>, ChainError> {
        if !authority.is_authority() {
            return Err(ChainError::NotAuthority);
        }
        if index >= self.registry.len() {
            return Err(ChainError::IndexOutOfRange {
                index,
                len: self.registry.len(),
            });
        }

        let old_len = self.registry.len();
        let mut entries = self.registry.clone();
        entries.truncate(index);

        let mut updates = registry_to_properties(&entries);
        for removed in index..old_len {
            updates.push((socket_key(removed), PropertyValue::Text(String::new())));
        }
        room.write(authority, updates)?;

        self.registry = entries;
        info!(
            "ChainTopology: cut chain at index {} ({} -> {} nodes)",
            index, old_len, index
        );
        Ok(self.sever_from(index))
    }

    /// Adopts the persisted registry after a room-property change.
    ///
    /// Nodes the new registry covers become confirmed. Confirmed nodes it no
    /// longer covers were cut and are severed; unconfirmed ones simply
    /// arrived ahead of their registry update and are kept.
    pub fn observe_registry(&mut self, room: &RoomProperties) -> Result<Vec<NetworkId>, ChainError> {
        let Some(entries) = registry_from_properties(room)? else {
            return Ok(Vec::new());
        };
        let len = entries.len();

        let mut cut = Vec::new();
        for node in self.nodes.values_mut() {
            if !node.state().is_registered() {
                continue;
            }
            let Some(index) = node.index() else {
                continue;
            };
            if index < len {
                node.set_confirmed(true);
            } else if node.is_confirmed() {
                cut.push((index, node.entity()));
            }
        }
        cut.sort();

        let severed: Vec<NetworkId> = cut
            .into_iter()
            .filter_map(|(_, entity)| self.sever_node(&entity).then_some(entity))
            .collect();
        if !severed.is_empty() {
            info!(
                "ChainTopology: observed registry of {} nodes, severed {}",
                len,
                severed.len()
            );
        }

        self.registry = entries;
        self.align();
        Ok(severed)
    }

    /// Drops a node from memory, e.g. when its entity despawns.
    pub fn remove_node(&mut self, entity: &NetworkId) -> Option<ChainNode> {
        let node = self.nodes.get(entity)?;
        if node.state() != NodeState::Severed {
            self.sever_node(entity);
        }
        self.nodes.remove(entity)
    }

    /// Forgets every node and the registry; used when the session ends.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.nodes.clear();
        self.by_index.clear();
    }

    fn sever_from(&mut self, index: usize) -> Vec<NetworkId> {
        let mut behind: Vec<(usize, NetworkId)> = self
            .by_index
            .iter()
            .filter(|(node_index, _)| **node_index >= index)
            .map(|(node_index, entity)| (*node_index, *entity))
            .collect();
        behind.sort();

        behind
            .into_iter()
            .filter_map(|(_, entity)| self.sever_node(&entity).then_some(entity))
            .collect()
    }

    fn sever_node(&mut self, entity: &NetworkId) -> bool {
        let Some(node) = self.nodes.get_mut(entity) else {
            return false;
        };
        if node.state() == NodeState::Severed {
            return false;
        }

        let index = node.index().filter(|_| node.state().is_registered());
        node.sever();
        if let Some(index) = index {
            if self.by_index.get(&index) == Some(entity) {
                self.by_index.remove(&index);
            }
        }

        info!("ChainTopology: severed {:?} (index {:?})", entity, index);
        self.events.push_back(ChainEvent::Severed {
            entity: *entity,
            index,
        });
        true
    }
}
