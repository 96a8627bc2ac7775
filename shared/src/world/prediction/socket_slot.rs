use log::warn;

use crate::{
    room::{decode_sockets, encode_sockets},
    world::prediction::error::PredictionError,
    ReservationId, Tick,
};

/// A tentative interaction awaiting the authority's broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingInteraction {
    /// The committed value this peer expects the authority to broadcast
    pub predicted: String,
    /// What the slot displayed before the prediction was applied
    pub prior_display: String,
    pub reservation: ReservationId,
    pub issued_at: Tick,
}

/// One item slot of a node. An empty string is an empty slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SocketSlot {
    committed: String,
    displayed: String,
    pending: Option<PendingInteraction>,
}

impl SocketSlot {
    /// The authority's truth as last observed.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// What this peer shows, including its own tentative change.
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingInteraction> {
        self.pending.as_ref()
    }

    pub(crate) fn begin(&mut self, predicted: String, reservation: ReservationId, now: Tick) {
        let prior_display = std::mem::replace(&mut self.displayed, predicted.clone());
        self.pending = Some(PendingInteraction {
            predicted,
            prior_display,
            reservation,
            issued_at: now,
        });
    }

    /// Takes the pending interaction and makes `committed` the displayed
    /// value again.
    pub(crate) fn settle(&mut self, committed: &str) -> Option<PendingInteraction> {
        self.committed = committed.to_string();
        self.displayed = committed.to_string();
        self.pending.take()
    }
}

/// The sockets of one node, persisted as one `delimiter`-joined string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocketSlots {
    slots: Vec<SocketSlot>,
    delimiter: char,
}

impl SocketSlots {
    pub fn new(count: usize, delimiter: char) -> Self {
        Self {
            slots: vec![SocketSlot::default(); count],
            delimiter,
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Item names may not contain the delimiter, or the persisted string
    /// would decode into a different number of slots.
    pub fn check_item(&self, item: &str) -> Result<(), PredictionError> {
        if item.contains(self.delimiter) {
            return Err(PredictionError::InvalidItemName {
                item: item.to_string(),
                delimiter: self.delimiter,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, socket: u8) -> Option<&SocketSlot> {
        self.slots.get(usize::from(socket))
    }

    pub(crate) fn get_mut(&mut self, socket: u8) -> Result<&mut SocketSlot, PredictionError> {
        let count = self.slots.len();
        self.slots
            .get_mut(usize::from(socket))
            .ok_or(PredictionError::SocketOutOfRange { socket, count })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SocketSlot> {
        self.slots.iter()
    }

    pub fn has_pending(&self) -> bool {
        self.slots.iter().any(SocketSlot::is_pending)
    }

    /// Committed items, in socket order.
    pub fn committed_items(&self) -> Vec<&str> {
        self.slots.iter().map(SocketSlot::committed).collect()
    }

    /// Persisted form of the committed contents.
    pub fn encode(&self) -> String {
        encode_sockets(&self.committed_items(), self.delimiter)
    }

    /// Splits a persisted string into one item per socket of this node.
    pub fn decode(&self, encoded: &str) -> Vec<String> {
        decode_sockets(encoded, self.delimiter, self.slots.len())
    }

    /// Commits an exchange on the deciding peer. `outgoing` is what the
    /// requester believed the socket held; a mismatch means the request is
    /// stale and nothing changes. Returns whether the exchange was applied.
    pub fn apply_authoritative(
        &mut self,
        socket: u8,
        incoming: &str,
        outgoing: &str,
    ) -> Result<bool, PredictionError> {
        self.check_item(incoming)?;
        let slot = self.get_mut(socket)?;
        if slot.committed != outgoing {
            warn!(
                "SocketSlots: stale request for socket {} (expected '{}', holds '{}')",
                socket, outgoing, slot.committed
            );
            return Ok(false);
        }

        slot.committed = incoming.to_string();
        if slot.pending.is_none() {
            slot.displayed = incoming.to_string();
        }
        Ok(true)
    }
}
