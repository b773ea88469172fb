//! Terrain controller: owns every level and runs the grid mutations.
//!
//! Each mutation first resolves what changed through read-only views and then
//! applies the result to the affected nodes, so neighbour lookups never alias
//! the node being rebuilt. Every mutation returns the cells whose visuals were
//! touched.
use std::collections::BTreeMap;

use crate::config::TerrainConfig;
use crate::error::{Result, TerrainError};
use crate::grid::{GridCoord, Level};
use crate::host::{PropVisual, VisualHost, VisualId};
use crate::layer::{CurrentLayer, LayerLookup, LayerStore, LayerView, TileId};
use crate::path::PathIndexTable;
use crate::props::{PropId, PropInstance, PropPalette, PropPlacement, WorldPoint};
use crate::refresh::{RefreshFlags, RefreshSet};
use crate::tile::{Neighborhood, NeighborWeights, RebuildContext, TileNode, VariantCatalog};
use crate::tile::weights;

/// Tile created by [`TerrainController::place_tile`].
#[derive(Debug)]
pub struct Placement<'a> {
    pub tile: &'a TileNode,
    pub refresh: RefreshSet,
}

pub struct TerrainController<H: VisualHost> {
    config: TerrainConfig,
    catalog: VariantCatalog,
    palette: PropPalette,
    table: &'static PathIndexTable,
    layers: BTreeMap<Level, LayerStore>,
    current: CurrentLayer,
    next_tile: u64,
    host: H,
}

impl<H: VisualHost> TerrainController<H> {
    /// Creates an empty controller with [`Level::DEFAULT`] active.
    ///
    /// Fails if the catalog lacks a mesh for any variant.
    pub fn new(
        catalog: VariantCatalog,
        palette: PropPalette,
        config: TerrainConfig,
        host: H,
    ) -> Result<Self> {
        catalog.validate()?;
        Ok(Self {
            config,
            catalog,
            palette,
            table: PathIndexTable::shared(),
            layers: BTreeMap::new(),
            current: CurrentLayer::new(Level::DEFAULT),
            next_tile: 0,
            host,
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn catalog(&self) -> &VariantCatalog {
        &self.catalog
    }

    pub fn palette(&self) -> &PropPalette {
        &self.palette
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Selects the path index used by [`Self::try_path_paint`].
    pub fn set_path_index(&mut self, path_index: u32) {
        self.config.path_index = path_index;
    }

    pub fn active_level(&self) -> Level {
        self.current.level()
    }

    pub fn current_layer(&self) -> &CurrentLayer {
        &self.current
    }

    pub fn layer(&self, level: Level) -> Option<&LayerStore> {
        self.layers.get(&level)
    }

    pub fn layers(&self) -> impl Iterator<Item = &LayerStore> + '_ {
        self.layers.values()
    }

    /// Tile at `coord` on the active level.
    pub fn tile_at(&self, coord: GridCoord) -> Option<&TileNode> {
        self.view(self.current.level())?.node(coord)
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.current.contains(coord)
    }

    // ========================================================================
    // Levels
    // ========================================================================

    /// Switches the active level and rebuilds the current-layer cache.
    pub fn set_active_level(&mut self, level: Level) {
        tracing::debug!(from = %self.current.level(), to = %level, "active level changed");
        self.current = CurrentLayer::new(level);
        self.initialize_current_layer();
    }

    /// Rebuilds the current-layer cache from the active level's store.
    pub fn initialize_current_layer(&mut self) {
        let level = self.current.level();
        self.current = CurrentLayer::from_store(level, self.layers.get(&level));
    }

    // ========================================================================
    // Tile mutations
    // ========================================================================

    /// Places a tile on the active level; `None` when the cell is taken.
    pub fn place_tile(&mut self, coord: GridCoord) -> Result<Option<Placement<'_>>> {
        if self.is_occupied(coord) {
            return Ok(None);
        }
        let refresh = self.add_tile(coord, None)?;
        Ok(self.tile_at(coord).map(|tile| Placement { tile, refresh }))
    }

    /// Adds a tile to `level` (the active level when `None`) and re-initializes
    /// it and its immediate neighbours.
    pub fn add_tile(&mut self, coord: GridCoord, level: Option<Level>) -> Result<RefreshSet> {
        let level = level.unwrap_or(self.current.level());
        let mut refresh = RefreshSet::new();

        let store = self
            .layers
            .entry(level)
            .or_insert_with(|| LayerStore::new(level));
        if store.tile_id(coord).is_some() {
            tracing::trace!(%level, %coord, "cell already occupied");
            return Ok(refresh);
        }

        let id = TileId(self.next_tile);
        self.next_tile += 1;
        store.adopt(TileNode::new(id, coord));
        store.add_tile_to_dictionary(coord, id);
        if level == self.current.level() {
            self.current.insert(coord, id);
        }
        tracing::debug!(%level, %coord, tile = %id, "tile added");

        let flags = self.reinitialize(level, id)?;
        refresh.mark(level, coord, flags);

        let neighbors: Vec<(GridCoord, TileId)> = match self.view(level) {
            Some(view) => self
                .tile_in(level, id)
                .map(|node| {
                    node.neighborhood()
                        .immediate()
                        .iter()
                        .filter_map(|at| view.tile(*at).map(|node| (*at, node.id())))
                        .collect()
                })
                .unwrap_or_default(),
            None => Vec::new(),
        };
        for (at, neighbor) in neighbors {
            let flags = self.reinitialize(level, neighbor)?;
            refresh.mark(level, at, flags);
        }

        Ok(refresh)
    }

    /// Removes the tile at `coord` from `level` (the active level when `None`),
    /// destroys its visual, and re-initializes every remaining tile of that level.
    pub fn delete_tile(&mut self, coord: GridCoord, level: Option<Level>) -> Result<RefreshSet> {
        let level = level.unwrap_or(self.current.level());
        let mut refresh = RefreshSet::new();

        let Some(store) = self.layers.get_mut(&level) else {
            tracing::trace!(%level, %coord, "delete on a level without tiles");
            return Ok(refresh);
        };
        let indexed = store.remove_tile_from_dictionary(coord);
        let cached = if level == self.current.level() {
            self.current.remove(coord)
        } else {
            None
        };
        let Some(mut node) = cached.or(indexed).and_then(|id| store.detach(id)) else {
            tracing::trace!(%level, %coord, "delete on an empty cell");
            return Ok(refresh);
        };
        node.release_visual(&mut self.host);
        refresh.mark(level, coord, RefreshFlags::REMOVED);
        tracing::debug!(%level, %coord, tile = %node.id(), "tile deleted");

        let remaining: Vec<(GridCoord, TileId)> = self
            .view(level)
            .map(|view| view.entries().collect())
            .unwrap_or_default();
        for (at, id) in remaining {
            let flags = self.reinitialize(level, id)?;
            refresh.mark(level, at, flags);
        }

        Ok(refresh)
    }

    /// Paints `coord` on the active level with `path_index`, which becomes the
    /// selected path index.
    pub fn paint_path(&mut self, coord: GridCoord, path_index: u32) -> Result<RefreshSet> {
        self.set_path_index(path_index);
        self.try_path_paint(coord)
    }

    /// Paints `coord` with the selected path index and re-blends the whole
    /// active level.
    ///
    /// The painted tile is repainted forced; every other paintable tile only
    /// when its blend index changed.
    pub fn try_path_paint(&mut self, coord: GridCoord) -> Result<RefreshSet> {
        let level = self.current.level();
        let path_index = self.config.path_index;
        let mut refresh = RefreshSet::new();

        let Some(target) = self.current.get(coord) else {
            tracing::trace!(%level, %coord, "paint on an empty cell");
            return Ok(refresh);
        };
        let Some(node) = self
            .layers
            .get_mut(&level)
            .and_then(|store| store.get_mut(target))
        else {
            return Ok(refresh);
        };
        if !node.set_path_texture(path_index) {
            tracing::trace!(%level, %coord, variant = %node.variant(), "tile is not paintable");
            return Ok(refresh);
        }
        tracing::debug!(%level, %coord, path_index, "path painted");

        let path_weights: Vec<(TileId, NeighborWeights)> = match self.view(level) {
            Some(view) => view
                .entries()
                .filter(|(_, id)| view.store().get(*id).is_some_and(TileNode::is_paintable))
                .map(|(at, id)| (id, NeighborWeights::compute(at, &view)))
                .collect(),
            None => Vec::new(),
        };
        self.for_each_node(level, path_weights, |node, weights| {
            node.replace_weights(weights)
        });

        let blends: Vec<(TileId, u32)> = match self.view(level) {
            Some(view) => view
                .entries()
                .filter_map(|(at, id)| {
                    let node = view.store().get(id)?;
                    let blend =
                        weights::blend_index(at, node.path_texture(), node.weights(), &view)?;
                    Some((id, blend))
                })
                .collect(),
            None => Vec::new(),
        };
        self.for_each_node(level, blends, |node, blend| node.apply_blend_index(blend));

        let entries: Vec<(GridCoord, TileId)> = self
            .current
            .tiles()
            .iter()
            .map(|(at, id)| (*at, *id))
            .collect();
        let Self {
            layers,
            host,
            table,
            ..
        } = self;
        let Some(store) = layers.get_mut(&level) else {
            return Ok(refresh);
        };
        if let Some(node) = store.get_mut(target) {
            if node.paint_path_texture(true, *table, &mut *host)? {
                refresh.mark(level, coord, RefreshFlags::TEXTURE);
            }
        }
        for (at, id) in entries {
            if id == target {
                continue;
            }
            let Some(node) = store.get_mut(id) else {
                continue;
            };
            if node.is_paintable() && node.paint_path_texture(false, *table, &mut *host)? {
                refresh.mark(level, at, RefreshFlags::TEXTURE);
            }
        }

        Ok(refresh)
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Destroys everything on the active level.
    pub fn clear_layer(&mut self) -> RefreshSet {
        self.clear_level(self.current.level())
    }

    /// Destroys every tile and prop of `level` and drops its store.
    pub fn clear_level(&mut self, level: Level) -> RefreshSet {
        let mut refresh = RefreshSet::new();
        let Some(mut store) = self.layers.remove(&level) else {
            return refresh;
        };

        let (tiles, props) = store.drain();
        tracing::debug!(%level, tiles = tiles.len(), props = props.len(), "level cleared");
        for mut node in tiles {
            node.release_visual(&mut self.host);
            refresh.mark(level, node.coord(), RefreshFlags::REMOVED);
        }
        for prop in props {
            if let Some(visual) = prop.visual {
                self.host.destroy(visual);
            }
            refresh.mark(
                level,
                prop.position.to_coord(),
                RefreshFlags::PROP | RefreshFlags::REMOVED,
            );
        }

        self.initialize_current_layer();
        refresh
    }

    /// Destroys every level.
    pub fn clear_all(&mut self) -> RefreshSet {
        let levels: Vec<Level> = self.layers.keys().copied().collect();
        let mut refresh = RefreshSet::new();
        for level in levels {
            refresh.merge(self.clear_level(level));
        }
        self.current.clear();
        refresh
    }

    /// Re-selects variant and yaw of every tile on every level from its stored
    /// neighbourhood.
    pub fn update_all_tile_prefabs(&mut self) -> Result<RefreshSet> {
        let targets: Vec<(Level, GridCoord, TileId)> = self
            .layers
            .iter()
            .flat_map(|(level, store)| {
                store
                    .index()
                    .iter()
                    .map(move |(coord, id)| (*level, *coord, *id))
            })
            .collect();
        tracing::debug!(tiles = targets.len(), "updating all tile prefabs");

        let mut refresh = RefreshSet::new();
        for (level, coord, id) in targets {
            let flags = self.rebuild_node(level, id, |node, ctx| node.update_variant(ctx))?;
            refresh.mark(level, coord, flags);
        }
        Ok(refresh)
    }

    /// Toggles top-only building and refreshes every tile.
    pub fn rebuild_all_variants(&mut self, build_top_only: bool) -> Result<RefreshSet> {
        self.config.build_top_only = build_top_only;
        self.update_all_tile_prefabs()
    }

    /// Swaps the mesh catalog and refreshes every tile. An incomplete catalog
    /// is rejected and the old one kept.
    pub fn replace_catalog(&mut self, catalog: VariantCatalog) -> Result<RefreshSet> {
        catalog.validate()?;
        self.catalog = catalog;
        self.update_all_tile_prefabs()
    }

    /// Rebuilds every store's coordinate index from its owned tiles.
    pub fn reinitialize_containers(&mut self) -> Result<()> {
        for store in self.layers.values_mut() {
            if let Err(error) = store.rebuild_index() {
                tracing::error!(%error, "tile lookup corrupted");
                return Err(error);
            }
        }
        Ok(())
    }

    /// Replaces all levels with persisted stores and respawns their visuals.
    ///
    /// Incoming stores are indexed before anything is touched, so a scene
    /// with a duplicate level or coordinate leaves the current terrain as it
    /// was. Existing levels are cleared only once every store is accepted.
    pub fn restore(&mut self, stores: Vec<LayerStore>) -> Result<RefreshSet> {
        let mut layers = BTreeMap::new();
        for mut store in stores {
            let level = store.level();
            if let Err(error) = store.rebuild_index() {
                tracing::error!(%error, "restored scene rejected");
                return Err(error);
            }
            store.children_mut().for_each(TileNode::forget_visual);
            if layers.insert(level, store).is_some() {
                return Err(TerrainError::DuplicateLevel { level });
            }
        }

        self.clear_all();
        self.next_tile = layers
            .values()
            .filter_map(LayerStore::max_tile_id)
            .map(|id| id.0 + 1)
            .max()
            .unwrap_or(0);
        self.layers = layers;
        self.reinitialize_containers()?;
        self.initialize_current_layer();
        tracing::debug!(levels = self.layers.len(), "terrain restored");

        let mut refresh = self.update_all_tile_prefabs()?;
        let Self {
            layers,
            palette,
            host,
            ..
        } = self;
        for (level, store) in layers.iter_mut() {
            for prop in store.props_mut() {
                prop.visual = None;
                let Some(asset) = palette.asset(prop.prop) else {
                    tracing::warn!(%level, prop = %prop.prop, "restored prop missing from palette");
                    continue;
                };
                prop.visual = Some(host.spawn_prop(PropVisual {
                    level: *level,
                    prop: prop.prop,
                    position: prop.position,
                    asset,
                })?);
                refresh.mark(*level, prop.position.to_coord(), RefreshFlags::PROP);
            }
        }
        Ok(refresh)
    }

    // ========================================================================
    // Props
    // ========================================================================

    /// Drops palette entry `prop` at `position` on the active level.
    ///
    /// Returns `None` when the palette has no such entry.
    pub fn place_prop(
        &mut self,
        prop: PropId,
        position: WorldPoint,
        placement: PropPlacement,
    ) -> Result<Option<VisualId>> {
        let Some(asset) = self.palette.asset(prop) else {
            tracing::trace!(%prop, "prop not in palette");
            return Ok(None);
        };
        let position = if placement.snap_to_grid {
            position.rounded()
        } else {
            position
        };
        let level = self.current.level();

        let visual = self.host.spawn_prop(PropVisual {
            level,
            prop,
            position,
            asset,
        })?;
        let mut instance = PropInstance::new(prop, position);
        instance.visual = Some(visual);
        self.layers
            .entry(level)
            .or_insert_with(|| LayerStore::new(level))
            .push_prop(instance);
        tracing::debug!(%level, %prop, x = position.x, z = position.z, "prop placed");

        Ok(Some(visual))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Coordinate view of `level`: the current-layer cache for the active
    /// level, the store's own index otherwise.
    fn view(&self, level: Level) -> Option<LayerLookup<'_>> {
        let store = self.layers.get(&level)?;
        let keys = if level == self.current.level() {
            self.current.tiles()
        } else {
            store.index()
        };
        Some(LayerLookup::new(keys, store))
    }

    fn tile_in(&self, level: Level, id: TileId) -> Option<&TileNode> {
        self.layers.get(&level)?.get(id)
    }

    /// Resolves the neighbourhood of tile `id` and rebuilds it.
    fn reinitialize(&mut self, level: Level, id: TileId) -> Result<RefreshFlags> {
        let Some(neighborhood) = self.view(level).and_then(|view| {
            let coord = view.store().get(id)?.coord();
            Some(Neighborhood::resolve(coord, &view))
        }) else {
            return Ok(RefreshFlags::empty());
        };
        self.rebuild_node(level, id, |node, ctx| node.initialize(neighborhood, ctx))
    }

    fn rebuild_node<F>(&mut self, level: Level, id: TileId, rebuild: F) -> Result<RefreshFlags>
    where
        F: FnOnce(&mut TileNode, &mut RebuildContext<'_, H>) -> Result<RefreshFlags>,
    {
        let Self {
            config,
            catalog,
            table,
            layers,
            host,
            ..
        } = self;
        let Some(node) = layers.get_mut(&level).and_then(|store| store.get_mut(id)) else {
            return Ok(RefreshFlags::empty());
        };
        let mut ctx = RebuildContext {
            level,
            catalog,
            table: *table,
            host,
            build_top_only: config.build_top_only,
        };
        rebuild(node, &mut ctx)
    }

    fn for_each_node<T>(
        &mut self,
        level: Level,
        updates: Vec<(TileId, T)>,
        mut apply: impl FnMut(&mut TileNode, T),
    ) {
        let Some(store) = self.layers.get_mut(&level) else {
            return;
        };
        for (id, value) in updates {
            if let Some(node) = store.get_mut(id) {
                apply(node, value);
            }
        }
    }
}
