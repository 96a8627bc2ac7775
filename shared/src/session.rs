use crate::{room::PropertyUpdates, NetworkId, PeerId};

/// Where a message goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendTarget {
    /// Whichever peer currently holds authority
    Authority,
    /// Every other peer in the session
    All,
    Peer(PeerId),
}

/// Something the session layer reports to a peer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Message { from: PeerId, bytes: Box<[u8]> },
    /// A batch of durable room properties, applied together.
    RoomPropertiesChanged(PropertyUpdates),
    AuthorityChanged(Option<PeerId>),
    PeerLeft(PeerId),
}

/// The external session layer: membership, authority assignment, durable
/// room properties and message delivery between peers.
///
/// Delivery is per-sender ordered at best; nothing is guaranteed across
/// senders or between messages and property batches.
pub trait SessionLink {
    fn local_peer(&self) -> PeerId;

    fn authority(&self) -> Option<PeerId>;

    fn send(&mut self, target: SendTarget, bytes: Box<[u8]>);

    /// Sends to everyone present and keeps the message for peers that join
    /// later, until `clear_buffered` is called for the same entity.
    fn send_buffered(&mut self, entity: NetworkId, bytes: Box<[u8]>);

    fn clear_buffered(&mut self, entity: NetworkId);

    /// Persists a batch of properties as one atomic update.
    fn set_room_properties(&mut self, updates: PropertyUpdates);

    fn poll(&mut self) -> Option<SessionEvent>;
}
