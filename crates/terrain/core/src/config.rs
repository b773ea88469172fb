/// Terrain configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerrainConfig {
    /// Forces the flat top variant for every tile regardless of neighbours.
    pub build_top_only: bool,
    /// Path texture index applied by the next path paint.
    pub path_index: u32,
}

impl TerrainConfig {
    // ===== compile-time constants =====
    /// Columns of the path index sheet.
    pub const ATLAS_COLUMNS: u32 = 8;
    /// Rows of the path index sheet.
    pub const ATLAS_ROWS: u32 = 6;
    /// Number of canonical path blend entries (one per atlas cell).
    pub const PATH_TABLE_LEN: usize = (Self::ATLAS_COLUMNS * Self::ATLAS_ROWS) as usize;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_PATH_INDEX: u32 = 0;

    pub fn new() -> Self {
        Self {
            build_top_only: false,
            path_index: Self::DEFAULT_PATH_INDEX,
        }
    }

    pub fn with_build_top_only(mut self, build_top_only: bool) -> Self {
        self.build_top_only = build_top_only;
        self
    }

    pub fn with_path_index(mut self, path_index: u32) -> Self {
        self.path_index = path_index;
        self
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::new()
    }
}
