use std::collections::HashMap;

use log::{debug, warn};
use naia_serde::{BitReader, BitWriter};

use crate::{
    tick_greater_than,
    world::replication::{
        error::ReplicationError,
        mut_channel::{MutChannel, MutReceiver},
        replicate::Replicate, replication_config::ReplicationConfig,
    },
    EntityUpdate, NetworkId, Tick,
};

/// What happened to a received broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Mirrored; lists the field indices whose value actually changed (empty
    /// for an unchanged resend).
    Applied(Vec<u8>),
    /// Older than (or equal to) the newest update already mirrored.
    Stale,
    /// This peer owns the entity, so it never mirrors anyone else's view.
    Ignored,
}

/// Periodic per-entity state broadcast.
///
/// The owner of an entity registers it here; on every network tick
/// `collect_updates` serializes the declared field set of every owned entity
/// that is dirty, and of every owned entity on the full-resend interval.
/// Observers feed received updates to `receive_update`, which overwrites the
/// local mirror and reports only the fields that actually changed.
pub struct ReplicationChannel {
    config: ReplicationConfig,
    owned: HashMap<NetworkId, MutReceiver>,
    latest_received: HashMap<NetworkId, Tick>,
    ticks_since_full: u16,
}

impl ReplicationChannel {
    pub fn new(config: ReplicationConfig) -> Self {
        Self {
            config,
            owned: HashMap::new(),
            latest_received: HashMap::new(),
            ticks_since_full: 0,
        }
    }

    pub fn is_owned(&self, entity: &NetworkId) -> bool {
        self.owned.contains_key(entity)
    }

    /// Starts broadcasting `entity`. All of its fields are marked dirty so
    /// the next tick carries the complete state.
    pub fn register_owned(
        &mut self,
        entity: NetworkId,
        replica: &mut dyn Replicate,
    ) -> Result<(), ReplicationError> {
        if self.is_owned(&entity) {
            return Err(ReplicationError::AlreadyOwned {
                entity_id: format!("{:?}", entity),
            });
        }

        let (mutator, receiver) = MutChannel::new_channel();
        replica.set_mutator(&mutator);
        receiver.try_mark_all(replica.field_count())?;

        self.owned.insert(entity, receiver);
        self.latest_received.remove(&entity);
        Ok(())
    }

    /// Stops broadcasting `entity`, e.g. after authority moved elsewhere.
    pub fn deregister_owned(&mut self, entity: &NetworkId, replica: &mut dyn Replicate) -> bool {
        replica.clear_mutator();
        self.owned.remove(entity).is_some()
    }

    /// Drops every trace of a despawned entity.
    pub fn forget(&mut self, entity: &NetworkId) {
        self.owned.remove(entity);
        self.latest_received.remove(entity);
    }

    /// Forgets the newest tick seen per entity. Needed when a new owner
    /// starts stamping updates from its own tick counter.
    pub fn reset_remote_ticks(&mut self) {
        self.latest_received.clear();
    }

    pub fn collect_updates<'a, I>(
        &mut self,
        tick: Tick,
        replicas: I,
    ) -> Result<Vec<EntityUpdate>, ReplicationError>
    where
        I: IntoIterator<Item = (NetworkId, &'a dyn Replicate)>,
    {
        self.ticks_since_full = self.ticks_since_full.saturating_add(1);
        let full_resend = self.ticks_since_full >= self.config.full_resend_interval;

        let mut updates = Vec::new();
        for (entity, replica) in replicas {
            let Some(receiver) = self.owned.get(&entity) else {
                continue;
            };
            if !full_resend && receiver.try_is_clear()? {
                continue;
            }

            let mut writer = BitWriter::new();
            for index in 0..replica.field_count() {
                replica.write_field(index, &mut writer)?;
            }
            receiver.try_clear()?;

            updates.push(EntityUpdate {
                entity,
                tick,
                fields: writer.to_bytes().to_vec(),
            });
        }

        if full_resend {
            self.ticks_since_full = 0;
        }

        Ok(updates)
    }

    pub fn receive_update(
        &mut self,
        update: &EntityUpdate,
        replica: &mut dyn Replicate,
    ) -> Result<ReceiveOutcome, ReplicationError> {
        if self.is_owned(&update.entity) {
            warn!(
                "ReplicationChannel: ignoring update for {:?}, this peer owns it",
                update.entity
            );
            return Ok(ReceiveOutcome::Ignored);
        }

        if let Some(latest) = self.latest_received.get(&update.entity) {
            if !tick_greater_than(update.tick, *latest) {
                debug!(
                    "ReplicationChannel: stale update for {:?} (tick {} <= {})",
                    update.entity, update.tick, latest
                );
                return Ok(ReceiveOutcome::Stale);
            }
        }

        let mut reader = BitReader::new(&update.fields);
        let mut changed = Vec::new();
        for index in 0..replica.field_count() {
            let field_changed = replica
                .read_field(index, &mut reader)
                .map_err(|_| ReplicationError::MalformedUpdate {
                    entity_id: format!("{:?}", update.entity),
                    index,
                })?;
            if field_changed {
                changed.push(index);
            }
        }

        self.latest_received.insert(update.entity, update.tick);
        Ok(ReceiveOutcome::Applied(changed))
    }
}
