use glam::{Quat, Vec3};
use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Position and orientation of a world object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Composes a pose expressed in this pose's local frame into world space.
    pub fn transform(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * local.position,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    pub fn abs_diff_eq(&self, other: &Pose, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Floats travel as their raw bit patterns.
impl Serde for Pose {
    fn ser(&self, writer: &mut dyn BitWrite) {
        for component in self.position.to_array() {
            component.to_bits().ser(writer);
        }
        for component in self.rotation.to_array() {
            component.to_bits().ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut position = [0.0f32; 3];
        for component in position.iter_mut() {
            *component = f32::from_bits(u32::de(reader)?);
        }
        let mut rotation = [0.0f32; 4];
        for component in rotation.iter_mut() {
            *component = f32::from_bits(u32::de(reader)?);
        }
        Ok(Pose {
            position: Vec3::from_array(position),
            rotation: Quat::from_array(rotation),
        })
    }

    fn bit_length(&self) -> u32 {
        7 * 0u32.bit_length()
    }
}
