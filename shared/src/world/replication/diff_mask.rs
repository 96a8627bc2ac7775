/// One bit per declared replicated field; a set bit means the field changed
/// since the owner last broadcast it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffMask {
    bits: u32,
}

impl DiffMask {
    pub const MAX_FIELDS: u8 = 32;

    pub fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn set_bit(&mut self, index: u8, value: bool) {
        if index >= Self::MAX_FIELDS {
            return;
        }
        if value {
            self.bits |= 1 << index;
        } else {
            self.bits &= !(1 << index);
        }
    }

    pub fn bit(&self, index: u8) -> bool {
        index < Self::MAX_FIELDS && self.bits & (1 << index) != 0
    }

    pub fn set_all(&mut self, field_count: u8) {
        for index in 0..field_count.min(Self::MAX_FIELDS) {
            self.set_bit(index, true);
        }
    }

    pub fn is_clear(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }
}
