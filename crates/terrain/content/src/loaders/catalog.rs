//! Variant catalog and prop palette loader.
//!
//! File format:
//! ```ron
//! (
//!     variants: {
//!         single_piece: "meshes/single_piece",
//!         triple_edge: "meshes/triple_edge",
//!         double_edge: "meshes/double_edge",
//!         single_edge: "meshes/single_edge",
//!         top: "meshes/top",
//!         corner: "meshes/corner",
//!     },
//!     props: ["props/rock", "props/bush"],
//! )
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use terrain_core::{PropPalette, TileVariant, VariantCatalog};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogRon {
    variants: BTreeMap<TileVariant, String>,
    #[serde(default)]
    props: Vec<String>,
}

/// Meshes and props the controller is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainCatalog {
    pub variants: VariantCatalog,
    pub props: PropPalette,
}

/// Loader for the variant catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    ///
    /// Fails when any of the six variants has no mesh.
    pub fn load(path: &Path) -> LoadResult<TerrainCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid catalog {}: {}", path.display(), e))
    }

    /// Parse catalog RON text.
    pub fn parse(content: &str) -> LoadResult<TerrainCatalog> {
        let data: CatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        let variants: VariantCatalog = data.variants.into_iter().collect();
        variants.validate()?;

        Ok(TerrainCatalog {
            variants,
            props: data.props.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_core::PropId;

    const FULL: &str = r#"(
        variants: {
            single_piece: "meshes/single_piece",
            triple_edge: "meshes/triple_edge",
            double_edge: "meshes/double_edge",
            single_edge: "meshes/single_edge",
            top: "meshes/top",
            corner: "meshes/corner",
        },
        props: ["props/rock", "props/bush"],
    )"#;

    #[test]
    fn parses_variants_and_props() {
        let catalog = CatalogLoader::parse(FULL).unwrap();
        assert_eq!(catalog.variants.len(), 6);
        assert_eq!(
            catalog.variants.asset(TileVariant::DoubleEdge),
            Some("meshes/double_edge")
        );
        assert_eq!(catalog.props.asset(PropId(1)), Some("props/bush"));
    }

    #[test]
    fn props_are_optional() {
        let without_props = FULL.replace(r#"props: ["props/rock", "props/bush"],"#, "");
        let catalog = CatalogLoader::parse(&without_props).unwrap();
        assert!(catalog.props.is_empty());
    }

    #[test]
    fn incomplete_catalog_fails() {
        let partial = r#"(variants: { top: "meshes/top" })"#;
        let error = CatalogLoader::parse(partial).unwrap_err();
        assert!(error.to_string().contains("single_piece"));
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.ron");
        std::fs::write(&path, "(variants: {})").unwrap();

        let error = CatalogLoader::load(&path).unwrap_err();
        assert!(error.to_string().contains("catalog.ron"));

        std::fs::write(&path, FULL).unwrap();
        assert!(CatalogLoader::load(&path).is_ok());
    }
}
