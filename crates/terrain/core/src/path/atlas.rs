use crate::config::TerrainConfig;

/// A cell of the path index sheet.
///
/// Sheet cells are counted left to right and top to bottom, while UVs grow
/// bottom to top, so the row is flipped when converting to texture space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtlasCell {
    pub column: u32,
    pub row: u32,
}

impl AtlasCell {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Converts a row-major cell index into sheet coordinates.
    pub const fn from_index(index: usize) -> Self {
        let index = index as u32;
        Self {
            column: index % TerrainConfig::ATLAS_COLUMNS,
            row: index / TerrainConfig::ATLAS_COLUMNS,
        }
    }

    pub fn uv_rect(self) -> UvRect {
        let columns = TerrainConfig::ATLAS_COLUMNS as f32;
        let rows = TerrainConfig::ATLAS_ROWS as f32;
        let width = 1.0 / columns;
        let height = 1.0 / rows;
        let flipped_row = rows - self.row as f32 - 1.0;

        UvRect {
            min: [width * self.column as f32, height * flipped_row],
            max: [width * (self.column + 1) as f32, height * (flipped_row + 1.0)],
        }
    }
}

/// Axis-aligned UV rectangle with a bottom-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRect {
    /// Per-vertex UVs for the flat top quad.
    pub fn quad(self) -> UvQuad {
        let [min_u, min_v] = self.min;
        let [max_u, max_v] = self.max;
        UvQuad([
            [min_u, min_v],
            [min_u, max_v],
            [max_u, max_v],
            [max_u, min_v],
        ])
    }
}

/// UVs for the four vertices of a top quad, in mesh vertex order.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UvQuad(pub [[f32; 2]; 4]);
