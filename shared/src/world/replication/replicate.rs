use naia_serde::{BitReader, BitWrite};

use crate::world::replication::{error::ReplicationError, mut_channel::PropertyMutator};

/// A component with a fixed, declared set of replicated fields.
///
/// Fields are addressed by index `0..field_count()`; the owner writes all of
/// them in index order and observers read them back in the same order.
pub trait Replicate {
    fn field_count(&self) -> u8;

    /// Hooks every field up to the owner's diff mask.
    fn set_mutator(&mut self, mutator: &PropertyMutator);

    fn clear_mutator(&mut self);

    fn write_field(&self, index: u8, writer: &mut dyn BitWrite) -> Result<(), ReplicationError>;

    /// Mirrors one field from a broadcast, returning whether it changed.
    fn read_field(&mut self, index: u8, reader: &mut BitReader) -> Result<bool, ReplicationError>;
}
