//! Persisted terrain scene loader.
//!
//! A scene holds the owned children (tiles and props) of every level store.
//! Coordinate indices and visual handles are not written; hand the loaded
//! stores to [`terrain_core::TerrainController::restore`] to rebuild both.

use std::path::Path;

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use terrain_core::LayerStore;

use crate::loaders::{LoadResult, read_file, write_file};

/// Current scene file version.
const SCENE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct SceneRon {
    version: u32,
    levels: Vec<LayerStore>,
}

#[derive(Debug, Serialize)]
struct SceneRef<'a> {
    version: u32,
    levels: Vec<&'a LayerStore>,
}

/// Loader for terrain scenes in RON.
pub struct SceneLoader;

impl SceneLoader {
    /// Load the level stores of a scene file.
    pub fn load(path: &Path) -> LoadResult<Vec<LayerStore>> {
        let content = read_file(path)?;
        let scene: SceneRon = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scene RON {}: {}", path.display(), e))?;

        if scene.version != SCENE_VERSION {
            anyhow::bail!(
                "Unsupported scene version {} in {} (expected {})",
                scene.version,
                path.display(),
                SCENE_VERSION
            );
        }

        tracing::debug!(path = %path.display(), levels = scene.levels.len(), "scene loaded");
        Ok(scene.levels)
    }

    /// Write `levels` as a scene file.
    pub fn save<'a>(
        path: &Path,
        levels: impl IntoIterator<Item = &'a LayerStore>,
    ) -> LoadResult<()> {
        let scene = SceneRef {
            version: SCENE_VERSION,
            levels: levels.into_iter().collect(),
        };
        let content = ron::ser::to_string_pretty(&scene, PrettyConfig::default())
            .map_err(|e| anyhow::anyhow!("Failed to serialize scene: {}", e))?;

        write_file(path, &content)?;
        tracing::debug!(path = %path.display(), levels = scene.levels.len(), "scene saved");
        Ok(())
    }
}
