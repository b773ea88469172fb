use super::GridOffset;

/// Compass direction of a neighbour relative to a tile.
///
/// Discriminants are bit flags; the path blend index is a bit-weighted sum of
/// them, so the values are part of the atlas contract and must not change.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum TileDirection {
    #[default]
    None = 0,
    North = 1,
    NorthEast = 2,
    East = 4,
    SouthEast = 8,
    South = 16,
    SouthWest = 32,
    West = 64,
    NorthWest = 128,
}

impl TileDirection {
    /// The eight neighbour directions, clockwise from north.
    pub const SURROUNDING: [TileDirection; 8] = [
        TileDirection::North,
        TileDirection::NorthEast,
        TileDirection::East,
        TileDirection::SouthEast,
        TileDirection::South,
        TileDirection::SouthWest,
        TileDirection::West,
        TileDirection::NorthWest,
    ];

    /// Classifies an offset by the signs of its components.
    ///
    /// Diagonals win over the axis-aligned directions; `(0, 0)` is `None`.
    pub const fn classify(offset: GridOffset) -> Self {
        let (dx, dz) = (offset.dx, offset.dz);
        if dx < 0 && dz < 0 {
            return Self::SouthWest;
        }
        if dx > 0 && dz < 0 {
            return Self::SouthEast;
        }
        if dx < 0 && dz > 0 {
            return Self::NorthWest;
        }
        if dx > 0 && dz > 0 {
            return Self::NorthEast;
        }
        if dz < 0 {
            return Self::South;
        }
        if dz > 0 {
            return Self::North;
        }
        if dx < 0 {
            return Self::West;
        }
        if dx > 0 {
            return Self::East;
        }
        Self::None
    }

    /// Bit value used by the blend index accumulation.
    #[inline]
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Unit offset pointing at the neighbour in this direction.
    pub const fn offset(self) -> GridOffset {
        match self {
            Self::None => GridOffset::new(0, 0),
            Self::North => GridOffset::new(0, 1),
            Self::NorthEast => GridOffset::new(1, 1),
            Self::East => GridOffset::new(1, 0),
            Self::SouthEast => GridOffset::new(1, -1),
            Self::South => GridOffset::new(0, -1),
            Self::SouthWest => GridOffset::new(-1, -1),
            Self::West => GridOffset::new(-1, 0),
            Self::NorthWest => GridOffset::new(-1, 1),
        }
    }

    /// Position in [`Self::SURROUNDING`], or `None` for [`TileDirection::None`].
    pub const fn slot(self) -> Option<usize> {
        match self {
            Self::None => None,
            other => Some((other as u8).trailing_zeros() as usize),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::SouthEast | Self::SouthWest | Self::NorthWest
        )
    }
}
