//! In-memory session layer for end-to-end tests.
//! Routes messages and room property batches between peers in one process,
//! with optional seeded reordering across streams.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, VecDeque},
    rc::Rc,
};

use log::{debug, info};

use convoy_shared::{
    NetworkId, PeerId, PropertyUpdates, PropertyValue, SendTarget, SessionEvent, SessionLink,
};

/// Which queue of a peer's inbox an event travels on. Each stream is FIFO;
/// nothing is ordered across streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Stream {
    /// Room property batches, authority assignment and membership
    Session,
    /// Messages from one sender
    From(PeerId),
}

#[derive(Default)]
struct Inbox {
    streams: BTreeMap<Stream, VecDeque<(u64, SessionEvent)>>,
    drop_next: usize,
}

impl Inbox {
    fn push(&mut self, stream: Stream, seq: u64, event: SessionEvent) {
        self.streams.entry(stream).or_default().push_back((seq, event));
    }

    fn is_empty(&self) -> bool {
        self.streams.values().all(VecDeque::is_empty)
    }

    fn len(&self) -> usize {
        self.streams.values().map(VecDeque::len).sum()
    }

    /// Oldest head first, or a random non-empty stream when shuffling.
    fn pop(&mut self, rng: Option<&fastrand::Rng>) -> Option<SessionEvent> {
        let ready: Vec<(Stream, u64)> = self
            .streams
            .iter()
            .filter_map(|(stream, queue)| queue.front().map(|(seq, _)| (*stream, *seq)))
            .collect();
        if ready.is_empty() {
            return None;
        }

        let stream = match rng {
            Some(rng) => ready[rng.usize(..ready.len())].0,
            None => ready.iter().min_by_key(|(_, seq)| *seq)?.0,
        };
        self.streams
            .get_mut(&stream)
            .and_then(VecDeque::pop_front)
            .map(|(_, event)| event)
    }
}

struct Hub {
    inboxes: BTreeMap<PeerId, Inbox>,
    authority: Option<PeerId>,
    room: HashMap<String, PropertyValue>,
    buffered: Vec<(NetworkId, PeerId, Box<[u8]>)>,
    next_peer: u16,
    next_seq: u64,
    rng: Option<fastrand::Rng>,
    dropped: usize,
}

impl Hub {
    fn new() -> Self {
        Self {
            inboxes: BTreeMap::new(),
            authority: None,
            room: HashMap::new(),
            buffered: Vec::new(),
            next_peer: 1,
            next_seq: 0,
            rng: None,
            dropped: 0,
        }
    }

    fn seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn deliver(&mut self, to: PeerId, stream: Stream, event: SessionEvent) {
        let seq = self.seq();
        let Some(inbox) = self.inboxes.get_mut(&to) else {
            debug!("LocalSession: {:?} is gone, discarding", to);
            return;
        };
        if matches!(stream, Stream::From(_)) && inbox.drop_next > 0 {
            inbox.drop_next -= 1;
            self.dropped += 1;
            debug!("LocalSession: dropped message to {:?}", to);
            return;
        }
        inbox.push(stream, seq, event);
    }

    fn others(&self, except: PeerId) -> Vec<PeerId> {
        self.inboxes
            .keys()
            .copied()
            .filter(|peer| *peer != except)
            .collect()
    }

    fn send(&mut self, from: PeerId, target: SendTarget, bytes: Box<[u8]>) {
        let recipients = match target {
            SendTarget::All => self.others(from),
            SendTarget::Authority => match self.authority {
                Some(authority) if authority != from => vec![authority],
                Some(_) => Vec::new(),
                None => {
                    debug!("LocalSession: no authority, discarding message from {:?}", from);
                    Vec::new()
                }
            },
            SendTarget::Peer(peer) if peer != from => vec![peer],
            SendTarget::Peer(_) => Vec::new(),
        };
        for to in recipients {
            let event = SessionEvent::Message {
                from,
                bytes: bytes.clone(),
            };
            self.deliver(to, Stream::From(from), event);
        }
    }

    fn broadcast_session(&mut self, except: Option<PeerId>, event: SessionEvent) {
        let peers: Vec<PeerId> = self
            .inboxes
            .keys()
            .copied()
            .filter(|peer| Some(*peer) != except)
            .collect();
        for peer in peers {
            self.deliver(peer, Stream::Session, event.clone());
        }
    }
}

/// The hub every [`LocalLink`] talks through.
#[derive(Clone)]
pub struct LocalSession {
    hub: Rc<RefCell<Hub>>,
}

impl LocalSession {
    pub fn new() -> Self {
        Self {
            hub: Rc::new(RefCell::new(Hub::new())),
        }
    }

    /// Delivers each peer's pending events in a seeded random order across
    /// streams, keeping every stream FIFO.
    pub fn with_shuffle(seed: u64) -> Self {
        let session = Self::new();
        session.hub.borrow_mut().rng = Some(fastrand::Rng::with_seed(seed));
        session
    }

    /// Adds a peer. The first peer to join becomes the authority. A joiner
    /// receives the current room properties and every buffered message.
    pub fn join(&self) -> LocalLink {
        let mut hub = self.hub.borrow_mut();
        let peer = PeerId::new(hub.next_peer);
        hub.next_peer += 1;
        hub.inboxes.insert(peer, Inbox::default());
        if hub.authority.is_none() {
            hub.authority = Some(peer);
        }

        if !hub.room.is_empty() {
            let mut snapshot: PropertyUpdates = hub
                .room
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            snapshot.sort_by(|a, b| a.0.cmp(&b.0));
            hub.deliver(peer, Stream::Session, SessionEvent::RoomPropertiesChanged(snapshot));
        }
        let buffered: Vec<(PeerId, Box<[u8]>)> = hub
            .buffered
            .iter()
            .map(|(_, from, bytes)| (*from, bytes.clone()))
            .collect();
        for (from, bytes) in buffered {
            hub.deliver(peer, Stream::From(from), SessionEvent::Message { from, bytes });
        }

        info!("LocalSession: {:?} joined", peer);
        LocalLink {
            peer,
            hub: self.hub.clone(),
        }
    }

    /// Removes a peer. Leaving as the authority leaves the session without
    /// one until [`LocalSession::set_authority`] is called.
    pub fn leave(&self, peer: PeerId) {
        let mut hub = self.hub.borrow_mut();
        if hub.inboxes.remove(&peer).is_none() {
            return;
        }
        info!("LocalSession: {:?} left", peer);
        hub.broadcast_session(None, SessionEvent::PeerLeft(peer));
        if hub.authority == Some(peer) {
            hub.authority = None;
            hub.broadcast_session(None, SessionEvent::AuthorityChanged(None));
        }
    }

    pub fn set_authority(&self, authority: Option<PeerId>) {
        let mut hub = self.hub.borrow_mut();
        hub.authority = authority;
        hub.broadcast_session(None, SessionEvent::AuthorityChanged(authority));
    }

    pub fn authority(&self) -> Option<PeerId> {
        self.hub.borrow().authority
    }

    /// Discards the next `count` messages addressed to `peer`. Session
    /// events are never dropped.
    pub fn drop_next_messages(&self, peer: PeerId, count: usize) {
        if let Some(inbox) = self.hub.borrow_mut().inboxes.get_mut(&peer) {
            inbox.drop_next += count;
        }
    }

    pub fn room_property(&self, key: &str) -> Option<PropertyValue> {
        self.hub.borrow().room.get(key).cloned()
    }

    pub fn buffered_count(&self) -> usize {
        self.hub.borrow().buffered.len()
    }

    pub fn pending_for(&self, peer: PeerId) -> usize {
        self.hub
            .borrow()
            .inboxes
            .get(&peer)
            .map(Inbox::len)
            .unwrap_or(0)
    }

    pub fn is_idle(&self) -> bool {
        self.hub.borrow().inboxes.values().all(Inbox::is_empty)
    }

    pub fn dropped_count(&self) -> usize {
        self.hub.borrow().dropped
    }
}

impl Default for LocalSession {
    fn default() -> Self {
        Self::new()
    }
}

/// One peer's view of a [`LocalSession`].
pub struct LocalLink {
    peer: PeerId,
    hub: Rc<RefCell<Hub>>,
}

impl SessionLink for LocalLink {
    fn local_peer(&self) -> PeerId {
        self.peer
    }

    fn authority(&self) -> Option<PeerId> {
        self.hub.borrow().authority
    }

    fn send(&mut self, target: SendTarget, bytes: Box<[u8]>) {
        self.hub.borrow_mut().send(self.peer, target, bytes);
    }

    fn send_buffered(&mut self, entity: NetworkId, bytes: Box<[u8]>) {
        let mut hub = self.hub.borrow_mut();
        hub.buffered.push((entity, self.peer, bytes.clone()));
        hub.send(self.peer, SendTarget::All, bytes);
    }

    fn clear_buffered(&mut self, entity: NetworkId) {
        self.hub
            .borrow_mut()
            .buffered
            .retain(|(buffered, _, _)| *buffered != entity);
    }

    fn set_room_properties(&mut self, updates: PropertyUpdates) {
        let mut hub = self.hub.borrow_mut();
        for (key, value) in &updates {
            hub.room.insert(key.clone(), value.clone());
        }
        hub.broadcast_session(Some(self.peer), SessionEvent::RoomPropertiesChanged(updates));
    }

    fn poll(&mut self) -> Option<SessionEvent> {
        let mut hub = self.hub.borrow_mut();
        let Hub { inboxes, rng, .. } = &mut *hub;
        inboxes.get_mut(&self.peer)?.pop(rng.as_ref())
    }
}
