use std::collections::BTreeMap;

use crate::error::{Result, TerrainError};
use crate::grid::{GridOffset, TileDirection};

use super::Neighborhood;

/// Mesh archetype of a tile, chosen from its occupied immediate neighbours.
#[derive(
    Clone,
    Copy,
    Debug,
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
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TileVariant {
    /// No neighbours: isolated piece.
    SinglePiece,
    /// One neighbour: three open sides.
    TripleEdge,
    /// Two opposite neighbours: straight connector.
    DoubleEdge,
    /// Three neighbours: one open side.
    SingleEdge,
    /// Fully surrounded (or forced): flat, path-paintable top.
    Top,
    /// Two adjacent neighbours: L-shaped corner.
    Corner,
}

impl TileVariant {
    pub const ALL: [TileVariant; 6] = [
        TileVariant::SinglePiece,
        TileVariant::TripleEdge,
        TileVariant::DoubleEdge,
        TileVariant::SingleEdge,
        TileVariant::Top,
        TileVariant::Corner,
    ];

    /// Picks the variant for `neighbors` occupied immediate cells.
    ///
    /// `facing` is the accumulated open-side vector; it cancels to zero when
    /// two neighbours sit on opposite sides.
    pub fn select(neighbors: usize, facing: GridOffset, build_top_only: bool) -> Self {
        if build_top_only {
            return Self::Top;
        }

        match neighbors {
            0 => Self::SinglePiece,
            1 => Self::TripleEdge,
            2 if facing.is_zero() => Self::DoubleEdge,
            2 => Self::Corner,
            3 => Self::SingleEdge,
            _ => Self::Top,
        }
    }

    /// Only flat tops carry a path texture.
    pub const fn is_paintable(self) -> bool {
        matches!(self, Self::Top)
    }
}

/// Yaw applied to a variant mesh, in quarter turns.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Yaw {
    #[default]
    #[strum(serialize = "0")]
    Deg0,
    #[strum(serialize = "90")]
    Deg90,
    #[strum(serialize = "180")]
    Deg180,
    #[strum(serialize = "270")]
    Deg270,
}

impl Yaw {
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Rotation for a tile with the given neighbourhood.
    ///
    /// Straight connectors turn by the axis their two neighbours lie on; every
    /// other piece turns by the classified open-side direction.
    pub fn resolve(neighborhood: &Neighborhood) -> Self {
        if let [first, second] = neighborhood.immediate() {
            if neighborhood.facing().is_zero() {
                let delta = *first - *second;
                return if delta.dx.abs() > delta.dz.abs() {
                    Self::Deg90
                } else {
                    Self::Deg0
                };
            }
        }

        Self::from_direction(neighborhood.direction())
    }

    pub const fn from_direction(direction: TileDirection) -> Self {
        match direction {
            TileDirection::South | TileDirection::SouthEast => Self::Deg0,
            TileDirection::West | TileDirection::SouthWest => Self::Deg90,
            TileDirection::North | TileDirection::NorthWest => Self::Deg180,
            TileDirection::East | TileDirection::NorthEast => Self::Deg270,
            TileDirection::None => Self::Deg0,
        }
    }
}

/// Mesh assets keyed by variant, supplied by the host tool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariantCatalog {
    assets: BTreeMap<TileVariant, String>,
}

impl VariantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, variant: TileVariant, asset: impl Into<String>) -> Self {
        self.insert(variant, asset);
        self
    }

    pub fn insert(&mut self, variant: TileVariant, asset: impl Into<String>) {
        self.assets.insert(variant, asset.into());
    }

    pub fn asset(&self, variant: TileVariant) -> Option<&str> {
        self.assets.get(&variant).map(String::as_str)
    }

    /// Like [`Self::asset`], but a missing entry is fatal.
    pub fn require(&self, variant: TileVariant) -> Result<&str> {
        self.asset(variant)
            .ok_or(TerrainError::MissingVariant { variant })
    }

    /// Fails on the first variant without a mesh.
    pub fn validate(&self) -> Result<()> {
        for variant in TileVariant::ALL {
            self.require(variant)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<(TileVariant, String)> for VariantCatalog {
    fn from_iter<I: IntoIterator<Item = (TileVariant, String)>>(iter: I) -> Self {
        Self {
            assets: iter.into_iter().collect(),
        }
    }
}
