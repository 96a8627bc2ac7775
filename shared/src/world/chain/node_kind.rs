use naia_serde::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedInteger};

use crate::world::chain::pose::Pose;

use glam::Vec3;

/// The variants a train car can be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Engine,
    Cargo,
    Turret,
    Radar,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Engine,
        NodeKind::Cargo,
        NodeKind::Turret,
        NodeKind::Radar,
    ];

    /// Stable numeric code used in the persisted `chain_types` array.
    pub fn code(&self) -> i32 {
        match self {
            NodeKind::Engine => 0,
            NodeKind::Cargo => 1,
            NodeKind::Turret => 2,
            NodeKind::Radar => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(NodeKind::Engine),
            1 => Some(NodeKind::Cargo),
            2 => Some(NodeKind::Turret),
            3 => Some(NodeKind::Radar),
            _ => None,
        }
    }

    /// The capability implementation for this variant.
    pub fn behavior(&self) -> &'static dyn NodeBehavior {
        match self {
            NodeKind::Engine => &EngineNode,
            NodeKind::Cargo => &CargoNode,
            NodeKind::Turret => &TurretNode,
            NodeKind::Radar => &RadarNode,
        }
    }
}

impl Serde for NodeKind {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<2>::new(self.code()).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let code = UnsignedInteger::<2>::de(reader)?.get() as i32;
        NodeKind::from_code(code).ok_or(SerdeErr)
    }

    fn bit_length(&self) -> u32 {
        <UnsignedInteger<2> as ConstBitLength>::const_bit_length()
    }
}

/// Per-level numbers for a node variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStats {
    pub max_health: u32,
    /// Distance from the front coupling to the rear socket.
    pub length: f32,
    pub socket_count: u8,
    pub attack_damage: u32,
    pub attack_delay_ticks: u32,
    pub detection_range: f32,
}

impl NodeStats {
    const fn hull(max_health: u32, length: f32) -> Self {
        Self {
            max_health,
            length,
            socket_count: 0,
            attack_damage: 0,
            attack_delay_ticks: 0,
            detection_range: 0.0,
        }
    }
}

/// Capability interface every node variant implements. Topology code only
/// talks to nodes through this trait.
pub trait NodeBehavior: Sync {
    fn kind(&self) -> NodeKind;

    fn levels(&self) -> &'static [NodeStats];

    /// Stats for `level`, clamped into the table. Level 0 and 1 both map to
    /// the first row.
    fn stats(&self, level: u8) -> NodeStats {
        let levels = self.levels();
        let row = usize::from(level.max(1)) - 1;
        levels[row.min(levels.len() - 1)]
    }

    fn max_level(&self) -> u8 {
        self.levels().len() as u8
    }

    /// Offset of the rear socket in this node's local frame.
    fn rear_offset(&self, level: u8) -> Pose {
        Pose::from_position(Vec3::new(0.0, 0.0, -self.stats(level).length))
    }

    fn can_attack(&self) -> bool {
        false
    }
}

pub struct EngineNode;
pub struct CargoNode;
pub struct TurretNode;
pub struct RadarNode;

static ENGINE_LEVELS: [NodeStats; 3] = [
    NodeStats::hull(400, 12.0),
    NodeStats::hull(600, 12.0),
    NodeStats::hull(900, 13.5),
];

static CARGO_LEVELS: [NodeStats; 3] = [
    NodeStats {
        socket_count: 2,
        ..NodeStats::hull(150, 8.0)
    },
    NodeStats {
        socket_count: 3,
        ..NodeStats::hull(220, 9.0)
    },
    NodeStats {
        socket_count: 4,
        ..NodeStats::hull(300, 10.0)
    },
];

static TURRET_LEVELS: [NodeStats; 3] = [
    NodeStats {
        attack_damage: 15,
        attack_delay_ticks: 30,
        ..NodeStats::hull(120, 6.0)
    },
    NodeStats {
        attack_damage: 25,
        attack_delay_ticks: 24,
        ..NodeStats::hull(160, 6.0)
    },
    NodeStats {
        attack_damage: 40,
        attack_delay_ticks: 18,
        ..NodeStats::hull(220, 6.5)
    },
];

static RADAR_LEVELS: [NodeStats; 2] = [
    NodeStats {
        detection_range: 80.0,
        ..NodeStats::hull(90, 5.0)
    },
    NodeStats {
        detection_range: 140.0,
        ..NodeStats::hull(120, 5.0)
    },
];

impl NodeBehavior for EngineNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Engine
    }

    fn levels(&self) -> &'static [NodeStats] {
        &ENGINE_LEVELS
    }
}

impl NodeBehavior for CargoNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Cargo
    }

    fn levels(&self) -> &'static [NodeStats] {
        &CARGO_LEVELS
    }
}

impl NodeBehavior for TurretNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Turret
    }

    fn levels(&self) -> &'static [NodeStats] {
        &TURRET_LEVELS
    }

    fn can_attack(&self) -> bool {
        true
    }
}

impl NodeBehavior for RadarNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Radar
    }

    fn levels(&self) -> &'static [NodeStats] {
        &RADAR_LEVELS
    }
}
