//! Terrain configuration loader.

use std::path::Path;

use terrain_core::TerrainConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for terrain configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<TerrainConfig> {
        let content = read_file(path)?;
        let config: TerrainConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}
