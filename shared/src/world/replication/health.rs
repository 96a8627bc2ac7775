use naia_serde::{BitReader, BitWrite};

use crate::world::replication::{
    error::ReplicationError, mut_channel::PropertyMutator, property::Property,
    replicate::Replicate,
};

pub const HEALTH_CURRENT: u8 = 0;
pub const HEALTH_MAX: u8 = 1;
pub const HEALTH_DEAD: u8 = 2;

/// Result of applying damage on the deciding peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Damaged,
    /// Health reached zero with this hit. Happens at most once per life.
    Died,
    AlreadyDead,
}

/// Replicated health: current and max value plus a terminal flag that is
/// broadcast alongside the `ConfirmDeath` announcement as a redundancy.
#[derive(Clone)]
pub struct Health {
    current: Property<u32>,
    max: Property<u32>,
    dead: Property<bool>,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: Property::new(max, HEALTH_CURRENT),
            max: Property::new(max, HEALTH_MAX),
            dead: Property::new(false, HEALTH_DEAD),
        }
    }

    pub fn current(&self) -> u32 {
        *self.current.get()
    }

    pub fn max(&self) -> u32 {
        *self.max.get()
    }

    pub fn is_dead(&self) -> bool {
        *self.dead.get()
    }

    /// Restores full health at a new maximum; used when a pooled instance is
    /// handed out again.
    pub fn reset(&mut self, max: u32) {
        self.max.set(max);
        self.current.set(max);
        self.dead.set(false);
    }

    /// Subtracts `amount`, clamping at zero.
    pub fn apply_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::AlreadyDead;
        }

        let remaining = self.current().saturating_sub(amount);
        self.current.set(remaining);

        if remaining == 0 {
            self.dead.set(true);
            return DamageOutcome::Died;
        }

        DamageOutcome::Damaged
    }
}

impl Replicate for Health {
    fn field_count(&self) -> u8 {
        3
    }

    fn set_mutator(&mut self, mutator: &PropertyMutator) {
        self.current.set_mutator(mutator);
        self.max.set_mutator(mutator);
        self.dead.set_mutator(mutator);
    }

    fn clear_mutator(&mut self) {
        self.current.clear_mutator();
        self.max.clear_mutator();
        self.dead.clear_mutator();
    }

    fn write_field(&self, index: u8, writer: &mut dyn BitWrite) -> Result<(), ReplicationError> {
        match index {
            HEALTH_CURRENT => self.current.write(writer),
            HEALTH_MAX => self.max.write(writer),
            HEALTH_DEAD => self.dead.write(writer),
            _ => {
                return Err(ReplicationError::FieldOutOfRange {
                    index,
                    field_count: self.field_count(),
                })
            }
        }
        Ok(())
    }

    fn read_field(&mut self, index: u8, reader: &mut BitReader) -> Result<bool, ReplicationError> {
        let result = match index {
            HEALTH_CURRENT => self.current.mirror(reader),
            HEALTH_MAX => self.max.mirror(reader),
            HEALTH_DEAD => self.dead.mirror(reader),
            _ => {
                return Err(ReplicationError::FieldOutOfRange {
                    index,
                    field_count: self.field_count(),
                })
            }
        };
        result.map_err(|_| ReplicationError::MalformedUpdate {
            entity_id: String::from("health"),
            index,
        })
    }
}
