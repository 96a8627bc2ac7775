use crate::{world::pool::poolable::Poolable, Prefab};

/// Counters for one prefab's pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances built because no idle one was available
    pub created: u32,
    /// Acquisitions served from the idle list
    pub reused: u32,
    /// Releases that dropped the instance instead of keeping it
    pub destroyed: u32,
    pub idle: usize,
}

/// Idle instances of one prefab.
pub struct EntityPool<T: Poolable> {
    prefab: Prefab,
    idle: Vec<T>,
    max_idle: usize,
    stats: PoolStats,
}

impl<T: Poolable> EntityPool<T> {
    pub fn new(prefab: Prefab, max_idle: usize) -> Self {
        Self {
            prefab,
            idle: Vec::new(),
            max_idle,
            stats: PoolStats::default(),
        }
    }

    pub fn prefab(&self) -> Prefab {
        self.prefab
    }

    /// Builds instances up front so the first acquisitions reuse them.
    pub fn prewarm(&mut self, count: usize) {
        let count = count.min(self.max_idle.saturating_sub(self.idle.len()));
        for _ in 0..count {
            self.idle.push(T::instantiate(self.prefab));
        }
        self.stats.created += count as u32;
    }

    pub fn take(&mut self) -> T {
        match self.idle.pop() {
            Some(instance) => {
                self.stats.reused += 1;
                instance
            }
            None => {
                self.stats.created += 1;
                T::instantiate(self.prefab)
            }
        }
    }

    /// Keeps the instance unless the idle list is full. Returns whether it
    /// was kept.
    pub fn give_back(&mut self, instance: T) -> bool {
        if self.idle.len() >= self.max_idle {
            self.stats.destroyed += 1;
            return false;
        }
        self.idle.push(instance);
        true
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.idle.len(),
            ..self.stats
        }
    }
}
