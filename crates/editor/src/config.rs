//! Editor session configuration.
use std::env;

use terrain_core::Level;

/// Session toggles the host tool exposes to the designer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    /// Side of the square brush used for tile strokes.
    pub brush_size: u8,
    /// Tile strokes delete instead of add.
    pub delete_mode: bool,
    /// Props snap to whole units on every axis.
    pub snap_to_grid: bool,
    /// Highlight tiles after each path paint.
    pub path_debug: bool,
    /// Level the session starts on.
    pub level: Level,
}

impl EditorConfig {
    pub const MIN_BRUSH_SIZE: u8 = 1;
    pub const MAX_BRUSH_SIZE: u8 = 3;

    pub const fn new() -> Self {
        Self {
            brush_size: Self::MIN_BRUSH_SIZE,
            delete_mode: false,
            snap_to_grid: false,
            path_debug: false,
            level: Level::DEFAULT,
        }
    }

    /// Brush size clamped to the supported range.
    pub fn with_brush_size(mut self, brush_size: u8) -> Self {
        self.brush_size = Self::clamp_brush(brush_size);
        self
    }

    pub fn with_delete_mode(mut self, delete_mode: bool) -> Self {
        self.delete_mode = delete_mode;
        self
    }

    pub fn with_snap_to_grid(mut self, snap_to_grid: bool) -> Self {
        self.snap_to_grid = snap_to_grid;
        self
    }

    pub fn with_path_debug(mut self, path_debug: bool) -> Self {
        self.path_debug = path_debug;
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn clamp_brush(brush_size: u8) -> u8 {
        brush_size.clamp(Self::MIN_BRUSH_SIZE, Self::MAX_BRUSH_SIZE)
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TERRAIN_BRUSH_SIZE` - Brush side, clamped to 1..=3 (default: 1)
    /// - `TERRAIN_DELETE_MODE` - Start in delete mode (default: false)
    /// - `TERRAIN_SNAP_TO_GRID` - Snap props to the grid (default: false)
    /// - `TERRAIN_PATH_DEBUG` - Highlight painted path tiles (default: false)
    /// - `TERRAIN_LEVEL` - Starting level (default: 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(size) = read_var::<u8>(&lookup, "TERRAIN_BRUSH_SIZE") {
            config.brush_size = Self::clamp_brush(size);
        }

        // Setting a flag without a value counts as "true"
        config.delete_mode = read_flag(&lookup, "TERRAIN_DELETE_MODE");
        config.snap_to_grid = read_flag(&lookup, "TERRAIN_SNAP_TO_GRID");
        config.path_debug = read_flag(&lookup, "TERRAIN_PATH_DEBUG");

        if let Some(level) = read_var::<u32>(&lookup, "TERRAIN_LEVEL") {
            config.level = Level(level);
        }

        config
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

fn read_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => true,
        Some(value) => value.trim().parse().unwrap_or(false),
        None => false,
    }
}
