use convoy_peer::{Events, Peer, PeerConfig, PeerEvent};
use convoy_shared::{NetworkId, NodeKind, PeerId, SlotInventory};

use crate::local_session::{LocalLink, LocalSession};

pub type TestPeer = Peer<LocalLink, SlotInventory>;

/// Inventory size every test peer starts with.
pub const INVENTORY_SLOTS: usize = 4;

/// Ticks `settle` runs before giving up on a quiet session.
const MAX_SETTLE_TICKS: usize = 64;

/// A session plus the peers taking part in it, ticked together.
pub struct TestSession {
    session: LocalSession,
    config: PeerConfig,
    peers: Vec<TestPeer>,
    events: Vec<Vec<PeerEvent>>,
}

impl TestSession {
    pub fn new() -> Self {
        Self::with(LocalSession::new(), PeerConfig::default())
    }

    pub fn shuffled(seed: u64) -> Self {
        Self::with(LocalSession::with_shuffle(seed), PeerConfig::default())
    }

    pub fn with(session: LocalSession, config: PeerConfig) -> Self {
        Self {
            session,
            config,
            peers: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Session with `count` peers; peer 0 is the authority.
    pub fn with_peers(count: usize) -> Self {
        let mut session = Self::new();
        for _ in 0..count {
            session.add_peer();
        }
        session
    }

    /// Joins a new peer and returns its position.
    pub fn add_peer(&mut self) -> usize {
        let link = self.session.join();
        let peer = Peer::new(
            self.config.clone(),
            link,
            SlotInventory::new(INVENTORY_SLOTS),
        );
        self.peers.push(peer);
        self.events.push(Vec::new());
        self.peers.len() - 1
    }

    pub fn session(&self) -> &LocalSession {
        &self.session
    }

    pub fn peer(&self, index: usize) -> &TestPeer {
        &self.peers[index]
    }

    pub fn peer_mut(&mut self, index: usize) -> &mut TestPeer {
        &mut self.peers[index]
    }

    pub fn peer_id(&self, index: usize) -> PeerId {
        self.peers[index].local_peer()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Ticks every connected peer once, in join order.
    pub fn tick(&mut self) {
        for (peer, events) in self.peers.iter_mut().zip(self.events.iter_mut()) {
            peer.tick();
            events.extend(peer.take_events());
        }
    }

    pub fn tick_n(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Ticks until no peer has anything left to receive.
    pub fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_TICKS {
            self.tick();
            if self.session.is_idle() {
                return;
            }
        }
        panic!("session did not settle within {} ticks", MAX_SETTLE_TICKS);
    }

    /// Every event the peer reported since the last call.
    pub fn take_events(&mut self, index: usize) -> Vec<PeerEvent> {
        let peer_events = self.peers[index].take_events();
        let mut events = std::mem::take(&mut self.events[index]);
        events.extend(peer_events);
        events
    }

    /// Disconnects a peer and removes it from the session.
    pub fn remove_peer(&mut self, index: usize) {
        let peer_id = self.peer_id(index);
        self.peers[index].disconnect();
        self.events[index].extend(self.peers[index].take_events());
        self.session.leave(peer_id);
    }

    /// Hands authority to the peer at `index`.
    pub fn migrate_authority(&mut self, index: usize) {
        let peer_id = self.peer_id(index);
        self.session.set_authority(Some(peer_id));
    }

    /// Appends nodes on the authority and lets the session settle.
    pub fn build_chain(&mut self, authority: usize, nodes: &[(NodeKind, u8)]) -> Vec<NetworkId> {
        let mut ids = Vec::new();
        for (kind, level) in nodes {
            let id = self.peers[authority]
                .append_node(*kind, *level)
                .expect("authority can append");
            ids.push(id);
        }
        self.settle();
        ids
    }
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

pub fn count_events<F: Fn(&PeerEvent) -> bool>(events: &[PeerEvent], predicate: F) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

pub fn drain(events: Events) -> Vec<PeerEvent> {
    events.into_iter().collect()
}
