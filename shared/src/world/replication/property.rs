use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::world::replication::mut_channel::PropertyMutator;

/// One declared replicated field.
///
/// On the owner, `set` records the change in the entity's diff mask (only
/// when the value actually differs). On observers, `mirror` overwrites the
/// cached value from a received broadcast and reports whether it changed.
#[derive(Clone)]
pub struct Property<T: Serde + PartialEq> {
    value: T,
    index: u8,
    mutator: Option<PropertyMutator>,
}

impl<T: Serde + PartialEq> Property<T> {
    pub fn new(value: T, index: u8) -> Self {
        Self {
            value,
            index,
            mutator: None,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set_mutator(&mut self, mutator: &PropertyMutator) {
        self.mutator = Some(mutator.clone());
    }

    pub fn clear_mutator(&mut self) {
        self.mutator = None;
    }

    /// Returns true when the stored value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        if let Some(mutator) = &self.mutator {
            mutator.mutate(self.index);
        }
        true
    }

    pub fn write(&self, writer: &mut dyn BitWrite) {
        self.value.ser(writer);
    }

    /// Reads a broadcast value and overwrites the mirror if it differs.
    /// Never marks the diff mask.
    pub fn mirror(&mut self, reader: &mut BitReader) -> Result<bool, SerdeErr> {
        let value = T::de(reader)?;
        if self.value == value {
            return Ok(false);
        }
        self.value = value;
        Ok(true)
    }
}
