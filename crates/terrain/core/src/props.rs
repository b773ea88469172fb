//! Scattered props placed on top of the terrain.
use std::fmt;

use crate::grid::GridCoord;
use crate::host::VisualId;

/// Index into the [`PropPalette`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropId(pub u32);

impl fmt::Display for PropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Point in world space; `y` is up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rounds every axis to the nearest integer, ties to even.
    pub fn rounded(self) -> Self {
        Self {
            x: self.x.round_ties_even(),
            y: self.y.round_ties_even(),
            z: self.z.round_ties_even(),
        }
    }

    /// Grid cell under the point, truncating toward zero.
    pub fn to_coord(self) -> GridCoord {
        GridCoord::new(self.x as i32, self.z as i32)
    }

    /// Moves the point by whole cells on the ground plane.
    pub fn shifted(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx as f32,
            y: self.y,
            z: self.z + dz as f32,
        }
    }
}

/// Prop assets offered by the host tool, addressed by [`PropId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PropPalette {
    assets: Vec<String>,
}

impl PropPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, asset: impl Into<String>) -> PropId {
        self.assets.push(asset.into());
        PropId((self.assets.len() - 1) as u32)
    }

    pub fn asset(&self, prop: PropId) -> Option<&str> {
        self.assets.get(prop.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PropPalette {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            assets: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A prop owned by a layer store.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropInstance {
    pub prop: PropId,
    pub position: WorldPoint,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub visual: Option<VisualId>,
}

impl PropInstance {
    pub fn new(prop: PropId, position: WorldPoint) -> Self {
        Self {
            prop,
            position,
            visual: None,
        }
    }
}

/// How a prop is dropped at the cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropPlacement {
    pub snap_to_grid: bool,
}
