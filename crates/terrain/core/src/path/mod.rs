//! Wang-style path blending: blend index lookup and atlas cell geometry.
//!
//! A paintable tile sums the weighted bit values of its eight neighbours into a
//! blend index (see [`crate::tile::weights`]). The [`PathIndexTable`] maps the
//! supported blend indices to a cell of the 8×6 path sheet, and [`AtlasCell`]
//! turns that cell into the UV rectangle of the tile's top quad.
mod atlas;
mod table;

pub use atlas::{AtlasCell, UvQuad, UvRect};
pub use table::PathIndexTable;
