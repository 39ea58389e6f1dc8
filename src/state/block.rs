//! Block kinds, bundles and capability sets.

use serde::{Deserialize, Serialize};

/// A named, fixed-size group of parameters contributed to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Deposited energy
    EDeposit,
    /// Four-position (x, y, z, t)
    Position,
    /// Unit direction (dx, dy, dz)
    Direction,
    /// Momentum magnitude
    Momentum,
    /// Particle charge
    Charge,
    /// Track curvature
    Curvature,
    /// Shower opening angle
    Cone,
    /// Track width
    Width,
}

impl BlockKind {
    /// Every block kind, in bit order.
    pub const ALL: [BlockKind; 8] = [
        BlockKind::EDeposit,
        BlockKind::Position,
        BlockKind::Direction,
        BlockKind::Momentum,
        BlockKind::Charge,
        BlockKind::Curvature,
        BlockKind::Cone,
        BlockKind::Width,
    ];

    /// Number of parameters in the block.
    pub const fn size(self) -> usize {
        match self {
            BlockKind::Position => 4,
            BlockKind::Direction => 3,
            _ => 1,
        }
    }

    /// Field names, in parameter order. These feed the type hash, so the
    /// spelling (including the lower case `width`) is part of the persisted
    /// format.
    pub const fn field_names(self) -> &'static [&'static str] {
        match self {
            BlockKind::EDeposit => &["EDeposit"],
            BlockKind::Position => &["X", "Y", "Z", "T"],
            BlockKind::Direction => &["DX", "DY", "DZ"],
            BlockKind::Momentum => &["Momentum"],
            BlockKind::Charge => &["Charge"],
            BlockKind::Curvature => &["Curvature"],
            BlockKind::Cone => &["Cone"],
            BlockKind::Width => &["width"],
        }
    }

    /// Name of the block kind.
    pub const fn name(self) -> &'static str {
        match self {
            BlockKind::EDeposit => "EDeposit",
            BlockKind::Position => "Position",
            BlockKind::Direction => "Direction",
            BlockKind::Momentum => "Momentum",
            BlockKind::Charge => "Charge",
            BlockKind::Curvature => "Curvature",
            BlockKind::Cone => "Cone",
            BlockKind::Width => "Width",
        }
    }

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// A run of blocks whose covariance is handled as one unit, including the
/// cross terms between its blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bundle {
    /// Position and direction (7 parameters)
    PositionDirection,
    /// Position, direction and curvature (8 parameters)
    PositionDirectionCurvature,
}

impl Bundle {
    /// Every bundle, in bit order.
    pub const ALL: [Bundle; 2] = [Bundle::PositionDirection, Bundle::PositionDirectionCurvature];

    /// The blocks of the bundle, in the order they must appear in a schema.
    pub const fn blocks(self) -> &'static [BlockKind] {
        match self {
            Bundle::PositionDirection => &[BlockKind::Position, BlockKind::Direction],
            Bundle::PositionDirectionCurvature => {
                &[BlockKind::Position, BlockKind::Direction, BlockKind::Curvature]
            }
        }
    }

    /// Total number of parameters in the bundle.
    pub const fn size(self) -> usize {
        let blocks = self.blocks();
        let mut size = 0;
        let mut i = 0;
        while i < blocks.len() {
            size += blocks[i].size();
            i += 1;
        }
        size
    }

    const fn bit(self) -> u16 {
        1 << (8 + self as u16)
    }
}

/// The set of blocks and bundles a state exposes.
///
/// Blocks take the low eight bits, bundles the bits above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities(u16);

impl Capabilities {
    /// A set with nothing in it.
    pub const fn empty() -> Self {
        Capabilities(0)
    }

    /// Add a block to the set.
    pub fn insert_block(&mut self, kind: BlockKind) {
        self.0 |= kind.bit();
    }

    /// Add a bundle to the set.
    pub fn insert_bundle(&mut self, bundle: Bundle) {
        self.0 |= bundle.bit();
    }

    /// Is the block in the set?
    pub const fn supports_block(self, kind: BlockKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Is the bundle in the set?
    pub const fn supports_bundle(self, bundle: Bundle) -> bool {
        self.0 & bundle.bit() != 0
    }

    /// The raw bitmask.
    pub const fn bits(self) -> u16 {
        self.0
    }
}
