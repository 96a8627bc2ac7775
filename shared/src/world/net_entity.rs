use crate::{
    world::{pool::Poolable, replication::Health},
    EntityOwner, NetworkId, Prefab, SpawnPayload,
};

const DEFAULT_MAX_HEALTH: u32 = 100;

/// A networked world object as held by a peer: identity, owner and
/// replicated health. Instances are recycled through the pool.
pub struct NetEntity {
    id: NetworkId,
    prefab: Prefab,
    owner: EntityOwner,
    health: Health,
    payload: Option<SpawnPayload>,
}

impl NetEntity {
    pub fn id(&self) -> NetworkId {
        self.id
    }

    pub fn owner(&self) -> EntityOwner {
        self.owner
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    /// The spawn payload, handed out once.
    pub fn take_spawn_payload(&mut self) -> Option<SpawnPayload> {
        self.payload.take()
    }
}

impl Poolable for NetEntity {
    fn instantiate(prefab: Prefab) -> Self {
        let max_health = match prefab {
            Prefab::Node(kind) => kind.behavior().stats(1).max_health,
            Prefab::Enemy | Prefab::Player => DEFAULT_MAX_HEALTH,
        };
        Self {
            id: NetworkId::from_u64(0),
            prefab,
            owner: EntityOwner::Authority,
            health: Health::new(max_health),
            payload: None,
        }
    }

    fn prefab(&self) -> Prefab {
        self.prefab
    }

    fn network_id(&self) -> NetworkId {
        self.id
    }

    fn on_spawn(&mut self, id: NetworkId, owner: EntityOwner, payload: Option<SpawnPayload>) {
        self.id = id;
        self.owner = owner;
        let max_health = match (self.prefab, &payload) {
            (Prefab::Node(kind), Some(payload)) => kind.behavior().stats(payload.level).max_health,
            _ => self.health.max(),
        };
        self.health.reset(max_health);
        self.payload = payload;
    }

    fn on_despawn(&mut self) {
        self.payload = None;
    }
}
