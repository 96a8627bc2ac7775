use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::{
    world::pool::{
        entity_pool::{EntityPool, PoolStats},
        error::PoolError,
        poolable::Poolable,
    },
    EntityOwner, NetworkId, Prefab, SpawnPayload,
};

/// What happened to a despawned instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DespawnOutcome {
    /// Returned to its prefab's pool for reuse
    Pooled,
    /// Dropped for good: no pool for its prefab, or the pool was full
    Destroyed,
}

/// The pooled lifecycle manager. Every networked spawn and despawn goes
/// through here.
///
/// Prefabs with a registered pool are recycled; prefabs without one are
/// instantiated on spawn and destroyed on despawn.
pub struct PoolRegistry<T: Poolable> {
    pools: HashMap<Prefab, EntityPool<T>>,
    live: HashSet<NetworkId>,
}

impl<T: Poolable> PoolRegistry<T> {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
            live: HashSet::new(),
        }
    }

    pub fn register_pool(
        &mut self,
        prefab: Prefab,
        prewarm: usize,
        max_idle: usize,
    ) -> Result<(), PoolError> {
        if self.pools.contains_key(&prefab) {
            return Err(PoolError::DuplicatePool {
                prefab: format!("{:?}", prefab),
            });
        }
        let mut pool = EntityPool::new(prefab, max_idle);
        pool.prewarm(prewarm);
        self.pools.insert(prefab, pool);
        Ok(())
    }

    pub fn has_pool(&self, prefab: &Prefab) -> bool {
        self.pools.contains_key(prefab)
    }

    pub fn is_live(&self, id: &NetworkId) -> bool {
        self.live.contains(id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn stats(&self, prefab: &Prefab) -> Result<PoolStats, PoolError> {
        self.pools
            .get(prefab)
            .map(EntityPool::stats)
            .ok_or_else(|| PoolError::UnknownPrefab {
                prefab: format!("{:?}", prefab),
            })
    }

    /// Hands out an instance for `id`, reusing an idle one when possible.
    /// The payload is delivered to the instance exactly once, here.
    pub fn spawn(
        &mut self,
        prefab: Prefab,
        id: NetworkId,
        owner: EntityOwner,
        payload: Option<SpawnPayload>,
    ) -> Result<T, PoolError> {
        if self.live.contains(&id) {
            return Err(PoolError::AlreadyLive {
                entity_id: format!("{:?}", id),
            });
        }

        let mut instance = match self.pools.get_mut(&prefab) {
            Some(pool) => pool.take(),
            None => {
                debug!("PoolRegistry: no pool for {:?}, instantiating", prefab);
                T::instantiate(prefab)
            }
        };
        instance.on_spawn(id, owner, payload);
        self.live.insert(id);
        Ok(instance)
    }

    /// Takes an instance back. It goes to its pool when one is registered
    /// and has room; otherwise it is dropped.
    pub fn despawn(&mut self, mut instance: T) -> Result<DespawnOutcome, PoolError> {
        let id = instance.network_id();
        if !self.live.remove(&id) {
            return Err(PoolError::NotLive {
                entity_id: format!("{:?}", id),
            });
        }

        instance.on_despawn();
        let prefab = instance.prefab();
        let pooled = match self.pools.get_mut(&prefab) {
            Some(pool) => pool.give_back(instance),
            None => false,
        };
        let outcome = if pooled {
            DespawnOutcome::Pooled
        } else {
            DespawnOutcome::Destroyed
        };

        info!("PoolRegistry: despawned {:?} ({:?})", id, outcome);
        Ok(outcome)
    }
}

impl<T: Poolable> Default for PoolRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
