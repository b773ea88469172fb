//! Integer grid primitives shared by every layer of the terrain.
//!
//! Tiles live on the `(x, z)` plane of a level; `Level` selects the elevation.
mod direction;

pub use direction::TileDirection;

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    pub const ORIGIN: Self = Self { x: 0, z: 0 };

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell one `offset` away, or `None` past the edge of the `i32` grid.
    pub fn checked_add(self, offset: GridOffset) -> Option<GridCoord> {
        Some(GridCoord::new(
            self.x.checked_add(offset.dx)?,
            self.z.checked_add(offset.dz)?,
        ))
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

impl Add<GridOffset> for GridCoord {
    type Output = GridCoord;

    fn add(self, rhs: GridOffset) -> GridCoord {
        GridCoord::new(self.x + rhs.dx, self.z + rhs.dz)
    }
}

impl Sub for GridCoord {
    type Output = GridOffset;

    fn sub(self, rhs: GridCoord) -> GridOffset {
        GridOffset::new(self.x - rhs.x, self.z - rhs.z)
    }
}

/// Relative step between two grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOffset {
    pub dx: i32,
    pub dz: i32,
}

impl GridOffset {
    pub const ZERO: Self = Self::new(0, 0);

    /// Axis-aligned neighbours, west first and north last.
    pub const IMMEDIATE: [GridOffset; 4] = [
        GridOffset::new(-1, 0),
        GridOffset::new(1, 0),
        GridOffset::new(0, -1),
        GridOffset::new(0, 1),
    ];

    /// Diagonal neighbours.
    pub const CORNERS: [GridOffset; 4] = [
        GridOffset::new(-1, -1),
        GridOffset::new(-1, 1),
        GridOffset::new(1, -1),
        GridOffset::new(1, 1),
    ];

    pub const fn new(dx: i32, dz: i32) -> Self {
        Self { dx, dz }
    }

    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dz == 0
    }
}

impl Add for GridOffset {
    type Output = GridOffset;

    fn add(self, rhs: GridOffset) -> GridOffset {
        GridOffset::new(self.dx + rhs.dx, self.dz + rhs.dz)
    }
}

impl AddAssign for GridOffset {
    fn add_assign(&mut self, rhs: GridOffset) {
        *self = *self + rhs;
    }
}

impl SubAssign for GridOffset {
    fn sub_assign(&mut self, rhs: GridOffset) {
        *self = *self + -rhs;
    }
}

impl Neg for GridOffset {
    type Output = GridOffset;

    fn neg(self) -> GridOffset {
        GridOffset::new(-self.dx, -self.dz)
    }
}

/// Elevation index of a layer. Levels below zero are not addressable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Level(pub u32);

impl Level {
    pub const GROUND: Self = Self(0);

    /// Level the editor starts painting on.
    pub const DEFAULT: Self = Self(1);
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_difference_is_an_offset() {
        let a = GridCoord::new(3, -2);
        let b = GridCoord::new(1, 1);
        assert_eq!(a - b, GridOffset::new(2, -3));
        assert_eq!(b + (a - b), a);
    }

    #[test]
    fn checked_add_stops_at_grid_edge() {
        let edge = GridCoord::new(i32::MAX, i32::MIN);
        assert_eq!(edge.checked_add(GridOffset::new(1, 0)), None);
        assert_eq!(edge.checked_add(GridOffset::new(0, -1)), None);
        assert_eq!(
            edge.checked_add(GridOffset::new(-1, 1)),
            Some(GridCoord::new(i32::MAX - 1, i32::MIN + 1))
        );
    }

    #[test]
    fn opposite_offsets_cancel() {
        let mut acc = GridOffset::ZERO;
        acc -= GridOffset::IMMEDIATE[0];
        acc -= GridOffset::IMMEDIATE[1];
        assert!(acc.is_zero());
    }
}
