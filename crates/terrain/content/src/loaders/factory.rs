//! Content factory for loading terrain data from a data directory.

use std::path::{Path, PathBuf};

use terrain_core::{LayerStore, TerrainConfig};

use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, SceneLoader, TerrainCatalog};

/// Content factory that loads all terrain content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── terrain.toml
/// ├── catalog.ron
/// └── scenes/
///     ├── meadow.ron
///     └── cliffs.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load terrain configuration from `terrain.toml`, falling back to the
    /// defaults when the file does not exist.
    pub fn load_config(&self) -> LoadResult<TerrainConfig> {
        let path = self.data_dir.join("terrain.toml");
        if !path.exists() {
            return Ok(TerrainConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load meshes and props from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<TerrainCatalog> {
        CatalogLoader::load(&self.data_dir.join("catalog.ron"))
    }

    /// Load a scene from `scenes/{scene_name}.ron`.
    pub fn load_scene(&self, scene_name: &str) -> LoadResult<Vec<LayerStore>> {
        SceneLoader::load(&self.scene_path(scene_name))
    }

    /// Save a scene to `scenes/{scene_name}.ron`.
    pub fn save_scene<'a>(
        &self,
        scene_name: &str,
        levels: impl IntoIterator<Item = &'a LayerStore>,
    ) -> LoadResult<()> {
        SceneLoader::save(&self.scene_path(scene_name), levels)
    }

    pub fn scene_path(&self, scene_name: &str) -> PathBuf {
        self.data_dir
            .join("scenes")
            .join(format!("{}.ron", scene_name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
