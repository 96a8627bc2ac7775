use std::{collections::VecDeque, vec::IntoIter};

use convoy_shared::{DespawnOutcome, EffectKind, EntityOwner, NetworkId, PeerId, Pose, Prefab};

/// Something collaborators (UI, audio, gameplay) may react to.
#[derive(Clone, Debug, PartialEq)]
pub enum PeerEvent {
    Spawned {
        entity: NetworkId,
        prefab: Prefab,
        owner: EntityOwner,
    },
    Despawned {
        entity: NetworkId,
        outcome: DespawnOutcome,
    },
    /// A mirrored field actually changed. Unchanged resends never produce
    /// this.
    FieldChanged { entity: NetworkId, field: u8 },
    /// Health reached zero. Reported once per life, whichever of the RPC or
    /// the state broadcast arrives first.
    DeathConfirmed { entity: NetworkId },
    EffectSpawned { effect: EffectKind, pose: Pose },
    NodeAttached {
        entity: NetworkId,
        index: usize,
        pose: Pose,
    },
    NodeSevered {
        entity: NetworkId,
        index: Option<usize>,
    },
    PredictionConfirmed {
        node: NetworkId,
        socket: u8,
        committed: String,
    },
    PredictionRolledBack {
        node: NetworkId,
        socket: u8,
        restored: String,
    },
    RoomPropertyChanged { key: String },
    AuthorityChanged { authority: Option<PeerId> },
    PeerLeft { peer: PeerId },
    LateJoinComplete { node_count: usize },
}

/// Events gathered since the last [`Peer::take_events`](crate::Peer::take_events).
#[derive(Debug, Default)]
pub struct Events {
    events: VecDeque<PeerEvent>,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerEvent> {
        self.events.iter()
    }

    /// Counts events matching `predicate`.
    pub fn count<F: Fn(&PeerEvent) -> bool>(&self, predicate: F) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    pub(crate) fn push(&mut self, event: PeerEvent) {
        self.events.push_back(event);
    }
}

impl IntoIterator for Events {
    type Item = PeerEvent;
    type IntoIter = IntoIter<PeerEvent>;

    fn into_iter(self) -> Self::IntoIter {
        Vec::from(self.events).into_iter()
    }
}
