use std::collections::{HashMap, VecDeque};

use log::{info, warn};

use crate::{
    tick_diff,
    world::{
        authority::SocketInteract,
        prediction::{
            error::PredictionError, inventory::Inventory, prediction_config::PredictionConfig,
            socket_slot::SocketSlots,
        },
    },
    NetworkId, Tick,
};

/// How a pending interaction ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PredictionEvent {
    /// The broadcast matched the prediction; the reservation was kept.
    Confirmed {
        node: NetworkId,
        socket: u8,
        committed: String,
    },
    /// The broadcast disagreed (or the interaction was cancelled); the
    /// reservation was released and the slot shows `restored`.
    RolledBack {
        node: NetworkId,
        socket: u8,
        restored: String,
    },
}

/// Optimistic socket interactions on the requesting peer.
///
/// A prediction tentatively fills an inventory slot and changes the socket's
/// displayed item, then waits for the authority's committed value. There is
/// no acknowledgement message: a committed value equal to the prediction
/// confirms it, any other value rolls it back.
pub struct PredictionEngine {
    config: PredictionConfig,
    nodes: HashMap<NetworkId, SocketSlots>,
    events: VecDeque<PredictionEvent>,
}

impl PredictionEngine {
    pub fn new(config: PredictionConfig) -> Self {
        Self {
            config,
            nodes: HashMap::new(),
            events: VecDeque::new(),
        }
    }

    pub fn register_node(&mut self, node: NetworkId, socket_count: usize, delimiter: char) {
        self.nodes
            .entry(node)
            .or_insert_with(|| SocketSlots::new(socket_count, delimiter));
    }

    /// Forgets a despawned node, rolling back anything still pending on it.
    pub fn remove_node(&mut self, node: &NetworkId, inventory: &mut dyn Inventory) {
        let Some(mut slots) = self.nodes.remove(node) else {
            return;
        };
        for socket in 0..slots.len() {
            let socket = socket as u8;
            let Ok(slot) = slots.get_mut(socket) else {
                continue;
            };
            let restored = slot.committed().to_string();
            if let Some(pending) = slot.settle(&restored) {
                Self::release(inventory, pending.reservation, false);
                self.events.push_back(PredictionEvent::RolledBack {
                    node: *node,
                    socket,
                    restored,
                });
            }
        }
    }

    pub fn slots(&self, node: &NetworkId) -> Option<&SocketSlots> {
        self.nodes.get(node)
    }

    /// Sockets as the deciding peer mutates them.
    pub fn slots_mut(&mut self, node: &NetworkId) -> Result<&mut SocketSlots, PredictionError> {
        self.nodes
            .get_mut(node)
            .ok_or_else(|| PredictionError::UnknownNode {
                entity_id: format!("{:?}", node),
            })
    }

    pub fn has_pending(&self) -> bool {
        self.nodes.values().any(SocketSlots::has_pending)
    }

    pub fn take_events(&mut self) -> VecDeque<PredictionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Works out the exchange between `socket` and `inventory_slot` without
    /// touching anything. The socket's item goes out, the inventory item
    /// comes in.
    pub fn plan(
        &self,
        node: NetworkId,
        socket: u8,
        inventory: &dyn Inventory,
        inventory_slot: usize,
    ) -> Result<SocketInteract, PredictionError> {
        let slots = self
            .nodes
            .get(&node)
            .ok_or_else(|| PredictionError::UnknownNode {
                entity_id: format!("{:?}", node),
            })?;
        let slot = slots
            .get(socket)
            .ok_or(PredictionError::SocketOutOfRange {
                socket,
                count: slots.len(),
            })?;
        if slot.is_pending() {
            return Err(PredictionError::SlotPending {
                entity_id: format!("{:?}", node),
                socket,
            });
        }

        let count = inventory.slot_count();
        if inventory_slot >= count {
            return Err(PredictionError::InventorySlotOutOfRange {
                slot: inventory_slot,
                count,
            });
        }
        if inventory.is_reserved(inventory_slot) {
            return Err(PredictionError::InventorySlotReserved {
                slot: inventory_slot,
            });
        }

        let outgoing = slot.committed().to_string();
        let incoming = inventory.item(inventory_slot).unwrap_or_default().to_string();
        if outgoing.is_empty() && incoming.is_empty() {
            return Err(PredictionError::NothingToExchange);
        }
        slots.check_item(&incoming)?;

        Ok(SocketInteract {
            node,
            socket,
            incoming,
            outgoing,
            reservation: 0,
        })
    }

    /// Applies the exchange tentatively: reserves the inventory slot with the
    /// socket's item, shows the inventory item in the socket and locks the
    /// socket. Returns the request to hand to the authority resolver.
    pub fn predict(
        &mut self,
        node: NetworkId,
        socket: u8,
        inventory: &mut dyn Inventory,
        inventory_slot: usize,
        now: Tick,
    ) -> Result<SocketInteract, PredictionError> {
        let mut request = self.plan(node, socket, inventory, inventory_slot)?;

        let taken = Some(request.outgoing.clone()).filter(|item| !item.is_empty());
        request.reservation = inventory.try_reserve(inventory_slot, taken)?;

        let slot = self.slots_mut(&node)?.get_mut(socket)?;
        slot.begin(request.incoming.clone(), request.reservation, now);

        info!(
            "PredictionEngine: predicting socket {} of {:?}: '{}' -> '{}'",
            socket, node, request.outgoing, request.incoming
        );
        Ok(request)
    }

    /// Feeds the committed value the authority broadcast for one socket.
    pub fn observe_committed(
        &mut self,
        node: NetworkId,
        socket: u8,
        committed: &str,
        inventory: &mut dyn Inventory,
    ) -> Result<(), PredictionError> {
        let slot = self.slots_mut(&node)?.get_mut(socket)?;
        let Some(pending) = slot.settle(committed) else {
            return Ok(());
        };

        if pending.predicted == committed {
            Self::release(inventory, pending.reservation, true);
            info!(
                "PredictionEngine: confirmed socket {} of {:?} as '{}'",
                socket, node, committed
            );
            self.events.push_back(PredictionEvent::Confirmed {
                node,
                socket,
                committed: committed.to_string(),
            });
        } else {
            Self::release(inventory, pending.reservation, false);
            info!(
                "PredictionEngine: rolled back socket {} of {:?}, expected '{}' got '{}'",
                socket, node, pending.predicted, committed
            );
            self.events.push_back(PredictionEvent::RolledBack {
                node,
                socket,
                restored: committed.to_string(),
            });
        }
        Ok(())
    }

    /// Feeds a node's whole committed socket list. Every pending socket on
    /// the node is resolved against it, changed or not.
    pub fn observe_node(
        &mut self,
        node: NetworkId,
        committed: &[String],
        inventory: &mut dyn Inventory,
    ) -> Result<(), PredictionError> {
        for (socket, item) in committed.iter().enumerate() {
            let Ok(socket) = u8::try_from(socket) else {
                break;
            };
            self.observe_committed(node, socket, item, inventory)?;
        }
        Ok(())
    }

    /// Rolls back interactions pending longer than the configured timeout.
    pub fn expire(&mut self, now: Tick, inventory: &mut dyn Inventory) {
        let Some(timeout) = self.config.pending_timeout else {
            return;
        };

        for (node, slots) in self.nodes.iter_mut() {
            for socket in 0..slots.len() {
                let socket = socket as u8;
                let Ok(slot) = slots.get_mut(socket) else {
                    continue;
                };
                let expired = slot
                    .pending()
                    .map(|pending| i32::from(tick_diff(pending.issued_at, now)) >= i32::from(timeout))
                    .unwrap_or(false);
                if !expired {
                    continue;
                }

                let restored = slot.committed().to_string();
                if let Some(pending) = slot.settle(&restored) {
                    warn!(
                        "PredictionEngine: socket {} of {:?} timed out after {} ticks",
                        socket, node, timeout
                    );
                    Self::release(inventory, pending.reservation, false);
                    self.events.push_back(PredictionEvent::RolledBack {
                        node: *node,
                        socket,
                        restored,
                    });
                }
            }
        }
    }

    /// Rolls back every pending interaction, e.g. on disconnect.
    pub fn cancel_all(&mut self, inventory: &mut dyn Inventory) {
        for (node, slots) in self.nodes.iter_mut() {
            for socket in 0..slots.len() {
                let socket = socket as u8;
                let Ok(slot) = slots.get_mut(socket) else {
                    continue;
                };
                let restored = slot.committed().to_string();
                if let Some(pending) = slot.settle(&restored) {
                    Self::release(inventory, pending.reservation, false);
                    self.events.push_back(PredictionEvent::RolledBack {
                        node: *node,
                        socket,
                        restored,
                    });
                }
            }
        }
    }

    fn release(inventory: &mut dyn Inventory, reservation: crate::ReservationId, keep: bool) {
        let result = if keep {
            inventory.commit(reservation)
        } else {
            inventory.rollback(reservation)
        };
        if let Err(err) = result {
            warn!("PredictionEngine: {}", err);
        }
    }
}
