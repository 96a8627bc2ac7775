use log::debug;

use crate::{world::prediction::error::PredictionError, ReservationId};

/// A peer's personal item storage, as far as socket prediction needs it.
///
/// A reservation tentatively places an item into a slot and locks the slot
/// until the reservation is committed or rolled back.
pub trait Inventory {
    fn slot_count(&self) -> usize;

    /// The item currently shown in `slot`, tentative or not.
    fn item(&self, slot: usize) -> Option<&str>;

    fn is_reserved(&self, slot: usize) -> bool;

    /// Locks `slot` and tentatively replaces its content with `incoming`.
    fn try_reserve(
        &mut self,
        slot: usize,
        incoming: Option<String>,
    ) -> Result<ReservationId, PredictionError>;

    /// Keeps the tentative content and unlocks the slot.
    fn commit(&mut self, reservation: ReservationId) -> Result<(), PredictionError>;

    /// Restores the content the slot had before the reservation.
    fn rollback(&mut self, reservation: ReservationId) -> Result<(), PredictionError>;

    /// Takes the item out of an unreserved slot.
    fn remove(&mut self, slot: usize) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
struct InventorySlot {
    item: Option<String>,
    reservation: Option<(ReservationId, Option<String>)>,
}

/// Fixed-size [`Inventory`].
#[derive(Clone, Debug)]
pub struct SlotInventory {
    slots: Vec<InventorySlot>,
    next_reservation: ReservationId,
}

impl SlotInventory {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![InventorySlot::default(); slot_count],
            next_reservation: 0,
        }
    }

    /// Puts an item into an unreserved slot, returning what it held.
    pub fn insert(&mut self, slot: usize, item: &str) -> Result<Option<String>, PredictionError> {
        let count = self.slots.len();
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(PredictionError::InventorySlotOutOfRange { slot, count })?;
        if entry.reservation.is_some() {
            return Err(PredictionError::InventorySlotReserved { slot });
        }
        Ok(entry.item.replace(item.to_string()))
    }

    pub fn reservation_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.reservation.is_some())
            .count()
    }

    fn find_reservation(&mut self, reservation: ReservationId) -> Option<&mut InventorySlot> {
        self.slots.iter_mut().find(|slot| {
            slot.reservation
                .as_ref()
                .map(|(id, _)| *id == reservation)
                .unwrap_or(false)
        })
    }
}

impl Inventory for SlotInventory {
    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn item(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|slot| slot.item.as_deref())
    }

    fn is_reserved(&self, slot: usize) -> bool {
        self.slots
            .get(slot)
            .map(|slot| slot.reservation.is_some())
            .unwrap_or(false)
    }

    fn try_reserve(
        &mut self,
        slot: usize,
        incoming: Option<String>,
    ) -> Result<ReservationId, PredictionError> {
        let count = self.slots.len();
        let reservation = self.next_reservation;
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(PredictionError::InventorySlotOutOfRange { slot, count })?;
        if entry.reservation.is_some() {
            return Err(PredictionError::InventorySlotReserved { slot });
        }

        let prior = std::mem::replace(&mut entry.item, incoming);
        entry.reservation = Some((reservation, prior));
        self.next_reservation = self.next_reservation.wrapping_add(1);

        debug!("SlotInventory: reserved slot {} as {}", slot, reservation);
        Ok(reservation)
    }

    fn commit(&mut self, reservation: ReservationId) -> Result<(), PredictionError> {
        let entry = self
            .find_reservation(reservation)
            .ok_or(PredictionError::UnknownReservation { reservation })?;
        entry.reservation = None;
        Ok(())
    }

    fn rollback(&mut self, reservation: ReservationId) -> Result<(), PredictionError> {
        let entry = self
            .find_reservation(reservation)
            .ok_or(PredictionError::UnknownReservation { reservation })?;
        if let Some((_, prior)) = entry.reservation.take() {
            entry.item = prior;
        }
        Ok(())
    }

    fn remove(&mut self, slot: usize) -> Option<String> {
        let entry = self.slots.get_mut(slot)?;
        if entry.reservation.is_some() {
            return None;
        }
        entry.item.take()
    }
}
