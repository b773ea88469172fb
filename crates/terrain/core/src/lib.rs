//! Grid terrain autotiling shared by the editor and offline tools.
//!
//! `terrain-core` owns the rules: which mesh variant and rotation a tile gets
//! from its occupied neighbours, and which path-atlas cell its top shows from
//! the path indices painted around it. All mutation flows through
//! [`terrain::TerrainController`]; visual objects live in the host behind
//! [`host::VisualHost`].
pub mod config;
pub mod error;
pub mod grid;
pub mod host;
pub mod layer;
pub mod path;
pub mod props;
pub mod refresh;
pub mod terrain;
pub mod tile;

pub use config::TerrainConfig;
pub use error::{ErrorSeverity, Result, TerrainError};
pub use grid::{GridCoord, GridOffset, Level, TileDirection};
pub use host::{
    HeadlessHost, HeadlessVisual, HostError, HostStats, PropVisual, TileVisual, VisualHost,
    VisualId,
};
pub use layer::{CurrentLayer, LayerLookup, LayerStore, LayerView, TileId};
pub use path::{AtlasCell, PathIndexTable, UvQuad, UvRect};
pub use props::{PropId, PropInstance, PropPalette, PropPlacement, WorldPoint};
pub use refresh::{RefreshFlags, RefreshSet};
pub use terrain::{Placement, TerrainController};
pub use tile::{
    NeighborWeights, Neighborhood, RebuildContext, TileNode, TileVariant, VariantCatalog, Yaw,
};
