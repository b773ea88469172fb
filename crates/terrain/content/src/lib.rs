//! Data files for the terrain tools.
//!
//! This crate turns RON/TOML data into terrain-core inputs:
//! - Variant mesh catalog and prop palette (RON)
//! - Terrain configuration (TOML)
//! - Persisted terrain scenes (RON, load and save)
//!
//! All loaders use terrain-core types directly through its `serde` feature.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConfigLoader, ContentFactory, LoadResult, SceneLoader, TerrainCatalog,
};
