use crate::{EntityOwner, NetworkId, Prefab, SpawnPayload};

/// An instance the lifecycle manager can hand out, take back and hand out
/// again.
pub trait Poolable {
    /// Builds a fresh instance when no idle one is available.
    fn instantiate(prefab: Prefab) -> Self
    where
        Self: Sized;

    fn prefab(&self) -> Prefab;

    fn network_id(&self) -> NetworkId;

    /// Called every time the instance is handed out, fresh or reused.
    fn on_spawn(&mut self, id: NetworkId, owner: EntityOwner, payload: Option<SpawnPayload>);

    /// Called when the instance goes back to its pool or is destroyed.
    fn on_despawn(&mut self);
}
