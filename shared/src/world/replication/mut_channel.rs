use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::world::replication::{diff_mask::DiffMask, error::ReplicationError};

// MutChannel
/// Links the properties of one owned entity to the replication channel: the
/// properties hold a [`PropertyMutator`], the channel holds the matching
/// [`MutReceiver`], both share one [`DiffMask`].
#[derive(Clone)]
pub struct MutChannel {
    mask: Arc<RwLock<DiffMask>>,
}

impl MutChannel {
    pub fn new_channel() -> (PropertyMutator, MutReceiver) {
        let channel = Self {
            mask: Arc::new(RwLock::new(DiffMask::new())),
        };

        let mutator = PropertyMutator {
            channel: channel.clone(),
        };
        let receiver = MutReceiver { channel };

        (mutator, receiver)
    }

    fn try_mask(&self) -> Result<RwLockReadGuard<'_, DiffMask>, ReplicationError> {
        self.mask
            .as_ref()
            .read()
            .map_err(|_| ReplicationError::MaskLockPoisoned)
    }

    fn try_mask_mut(&self) -> Result<RwLockWriteGuard<'_, DiffMask>, ReplicationError> {
        self.mask
            .as_ref()
            .write()
            .map_err(|_| ReplicationError::MaskLockPoisoned)
    }
}

// PropertyMutator
/// Held by a [`Property`](crate::Property); marks its field dirty on change.
#[derive(Clone)]
pub struct PropertyMutator {
    channel: MutChannel,
}

impl PropertyMutator {
    /// Marks `index` dirty. Returns false if the mask could not be locked.
    pub fn mutate(&self, index: u8) -> bool {
        match self.channel.try_mask_mut() {
            Ok(mut mask) => {
                mask.set_bit(index, true);
                true
            }
            Err(_) => false,
        }
    }
}

// MutReceiver
/// Held by the replication channel for each owned entity.
#[derive(Clone)]
pub struct MutReceiver {
    channel: MutChannel,
}

impl MutReceiver {
    pub fn try_is_clear(&self) -> Result<bool, ReplicationError> {
        Ok(self.channel.try_mask()?.is_clear())
    }

    pub fn try_mask(&self) -> Result<DiffMask, ReplicationError> {
        Ok(*self.channel.try_mask()?)
    }

    pub fn try_mark_all(&self, field_count: u8) -> Result<(), ReplicationError> {
        self.channel.try_mask_mut()?.set_all(field_count);
        Ok(())
    }

    pub fn try_clear(&self) -> Result<(), ReplicationError> {
        self.channel.try_mask_mut()?.clear();
        Ok(())
    }
}
