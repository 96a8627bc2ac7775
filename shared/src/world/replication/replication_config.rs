/// Contains Config properties which will be used by the replication channel
#[derive(Clone, Debug)]
pub struct ReplicationConfig {
    /// Every owned entity's full declared field set is resent on this tick
    /// interval even when nothing changed, so lossy links and late joiners
    /// converge. Dirty entities are always sent on the next tick.
    pub full_resend_interval: u16,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            full_resend_interval: 30,
        }
    }
}
