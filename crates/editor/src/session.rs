//! Editor session: turns discrete pointer events into terrain mutations.
//!
//! The session owns the toggles the designer flips (tool, brush, delete mode,
//! snap-to-grid, path debugging, level) and passes them explicitly into the
//! controller. Every handler runs to completion before the next event.
use terrain_content::ContentFactory;
use terrain_core::{
    Level, PropId, PropPlacement, RefreshFlags, RefreshSet, TerrainController, TileNode,
    VisualHost,
};

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::tool::{EditorTool, PointerEvent};

pub struct EditorSession<H: VisualHost> {
    terrain: TerrainController<H>,
    config: EditorConfig,
    tool: EditorTool,
    selected_prop: Option<PropId>,
}

impl<H: VisualHost> EditorSession<H> {
    /// Wraps `terrain`, switching it to the configured starting level.
    pub fn new(terrain: TerrainController<H>, config: EditorConfig) -> Self {
        let mut session = Self {
            terrain,
            config: config.clone(),
            tool: EditorTool::default(),
            selected_prop: None,
        };
        session.set_level(config.level);
        session
    }

    /// Builds a session from the catalog and terrain config in `factory`'s
    /// data directory.
    pub fn open(factory: &ContentFactory, host: H, config: EditorConfig) -> Result<Self> {
        let terrain_config = factory.load_config()?;
        let catalog = factory.load_catalog()?;
        let terrain =
            TerrainController::new(catalog.variants, catalog.props, terrain_config, host)?;
        tracing::info!(data_dir = %factory.data_dir().display(), "editor session opened");
        Ok(Self::new(terrain, config))
    }

    pub fn terrain(&self) -> &TerrainController<H> {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut TerrainController<H> {
        &mut self.terrain
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> EditorTool {
        self.tool
    }

    pub fn level(&self) -> Level {
        self.terrain.active_level()
    }

    pub fn selected_prop(&self) -> Option<PropId> {
        self.selected_prop
    }

    // ===== toggles =====

    pub fn select_tool(&mut self, tool: EditorTool) {
        tracing::debug!(%tool, "tool selected");
        self.tool = tool;
    }

    pub fn select_prop(&mut self, prop: Option<PropId>) {
        self.selected_prop = prop;
    }

    pub fn set_brush_size(&mut self, size: u8) -> Result<()> {
        let range = EditorConfig::MIN_BRUSH_SIZE..=EditorConfig::MAX_BRUSH_SIZE;
        if !range.contains(&size) {
            return Err(EditorError::InvalidBrushSize {
                size,
                min: *range.start(),
                max: *range.end(),
            });
        }
        self.config.brush_size = size;
        Ok(())
    }

    pub fn set_delete_mode(&mut self, delete_mode: bool) {
        self.config.delete_mode = delete_mode;
    }

    pub fn set_snap_to_grid(&mut self, snap_to_grid: bool) {
        self.config.snap_to_grid = snap_to_grid;
    }

    pub fn set_path_debug(&mut self, path_debug: bool) {
        self.config.path_debug = path_debug;
    }

    pub fn set_path_index(&mut self, path_index: u32) {
        self.terrain.set_path_index(path_index);
    }

    pub fn set_build_top_only(&mut self, build_top_only: bool) -> Result<RefreshSet> {
        Ok(self.terrain.rebuild_all_variants(build_top_only)?)
    }

    // ===== levels =====

    /// Activates `level`; the current-layer cache is only rebuilt when the
    /// level actually changes.
    pub fn set_level(&mut self, level: Level) {
        if level == self.terrain.active_level() {
            return;
        }
        self.terrain.set_active_level(level);
    }

    pub fn level_up(&mut self) {
        self.set_level(Level(self.level().0.saturating_add(1)));
    }

    /// Stops at [`Level::GROUND`].
    pub fn level_down(&mut self) {
        self.set_level(Level(self.level().0.saturating_sub(1)));
    }

    // ===== pointer =====

    /// Applies the active tool at the pointer.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<RefreshSet> {
        match self.tool {
            EditorTool::Tiles => self.stroke(event),
            EditorTool::Paths => self.paint(event),
            EditorTool::Props => self.drop_prop(event),
        }
    }

    /// Adds or deletes tiles under a square brush anchored at the rounded
    /// cursor and growing toward -x/-z.
    fn stroke(&mut self, event: PointerEvent) -> Result<RefreshSet> {
        let cursor = event.point.rounded();
        let deleting = self.config.delete_mode || event.shift;
        let brush = i32::from(self.config.brush_size);
        let mut refresh = RefreshSet::new();

        for dx in 0..brush {
            for dz in 0..brush {
                let coord = cursor.shifted(-dx, -dz).to_coord();
                let occupied = self.terrain.is_occupied(coord);
                if occupied && deleting {
                    refresh.merge(self.terrain.delete_tile(coord, None)?);
                } else if !occupied && !deleting {
                    refresh.merge(self.terrain.add_tile(coord, None)?);
                }
            }
        }
        Ok(refresh)
    }

    fn paint(&mut self, event: PointerEvent) -> Result<RefreshSet> {
        let coord = event.point.rounded().to_coord();
        let refresh = self.terrain.try_path_paint(coord)?;

        let painted = refresh
            .flags(self.level(), coord)
            .contains(RefreshFlags::TEXTURE);
        if self.config.path_debug && painted {
            if let Some(visual) = self.terrain.tile_at(coord).and_then(TileNode::visual) {
                self.terrain.host_mut().mark_debug(visual);
            }
        }
        Ok(refresh)
    }

    fn drop_prop(&mut self, event: PointerEvent) -> Result<RefreshSet> {
        let mut refresh = RefreshSet::new();
        let Some(prop) = self.selected_prop else {
            tracing::trace!("no prop selected");
            return Ok(refresh);
        };

        let placement = PropPlacement {
            snap_to_grid: self.config.snap_to_grid,
        };
        if self.terrain.place_prop(prop, event.point, placement)?.is_some() {
            let position = if placement.snap_to_grid {
                event.point.rounded()
            } else {
                event.point
            };
            refresh.mark(self.level(), position.to_coord(), RefreshFlags::PROP);
        }
        Ok(refresh)
    }

    // ===== bulk =====

    pub fn clear_layer(&mut self) -> RefreshSet {
        self.terrain.clear_layer()
    }

    pub fn clear_all(&mut self) -> RefreshSet {
        self.terrain.clear_all()
    }

    /// Replaces the terrain with `scenes/{scene_name}.ron` from `factory`.
    pub fn load_scene(
        &mut self,
        factory: &ContentFactory,
        scene_name: &str,
    ) -> Result<RefreshSet> {
        let levels = factory.load_scene(scene_name)?;
        Ok(self.terrain.restore(levels)?)
    }

    pub fn save_scene(&self, factory: &ContentFactory, scene_name: &str) -> Result<()> {
        factory.save_scene(scene_name, self.terrain.layers())?;
        Ok(())
    }
}
