//! Per-level tile storage and the views the tile logic reads through.
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, TerrainError};
use crate::grid::{GridCoord, Level};
use crate::props::PropInstance;
use crate::tile::TileNode;

/// Stable handle of a tile, unique across all levels of a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Read-only coordinate lookup used by neighbour resolution and path weighting.
pub trait LayerView {
    fn tile(&self, coord: GridCoord) -> Option<&TileNode>;

    fn contains(&self, coord: GridCoord) -> bool {
        self.tile(coord).is_some()
    }
}

/// Tiles and props of a single level.
///
/// `children` owns the nodes; `index` maps coordinates onto them and is never
/// persisted. After loading, [`LayerStore::rebuild_index`] recovers it by
/// scanning the children.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerStore {
    level: Level,
    children: BTreeMap<TileId, TileNode>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: BTreeMap<GridCoord, TileId>,
    #[cfg_attr(feature = "serde", serde(default))]
    props: Vec<PropInstance>,
}

impl LayerStore {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Store with owned children but no coordinate index yet.
    pub fn from_children(
        level: Level,
        children: impl IntoIterator<Item = TileNode>,
        props: Vec<PropInstance>,
    ) -> Self {
        Self {
            level,
            children: children.into_iter().map(|node| (node.id(), node)).collect(),
            index: BTreeMap::new(),
            props,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Takes ownership of `node` without indexing it.
    pub fn adopt(&mut self, node: TileNode) -> TileId {
        let id = node.id();
        self.children.insert(id, node);
        id
    }

    /// Drops the owned node, returning it so its visual can be released.
    pub fn detach(&mut self, id: TileId) -> Option<TileNode> {
        self.children.remove(&id)
    }

    /// Guarded insert: returns false and keeps the old entry if `coord` is taken.
    pub fn add_tile_to_dictionary(&mut self, coord: GridCoord, id: TileId) -> bool {
        if self.index.contains_key(&coord) {
            return false;
        }
        self.index.insert(coord, id);
        true
    }

    /// Guarded remove: `None` if `coord` was not indexed.
    pub fn remove_tile_from_dictionary(&mut self, coord: GridCoord) -> Option<TileId> {
        self.index.remove(&coord)
    }

    /// Rebuilds the coordinate index from the owned children.
    ///
    /// Two children claiming the same coordinate mean the persisted state is
    /// corrupt; the index is left empty in that case.
    pub fn rebuild_index(&mut self) -> Result<()> {
        self.index.clear();
        let mut index = BTreeMap::new();
        for node in self.children.values() {
            if let Some(existing) = index.insert(node.coord(), node.id()) {
                return Err(TerrainError::DuplicateCoordinate {
                    level: self.level,
                    coord: node.coord(),
                    existing,
                    duplicate: node.id(),
                });
            }
        }
        self.index = index;
        Ok(())
    }

    pub fn tile_id(&self, coord: GridCoord) -> Option<TileId> {
        self.index.get(&coord).copied()
    }

    pub fn get(&self, id: TileId) -> Option<&TileNode> {
        self.children.get(&id)
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut TileNode> {
        self.children.get_mut(&id)
    }

    pub fn index(&self) -> &BTreeMap<GridCoord, TileId> {
        &self.index
    }

    pub fn children(&self) -> impl Iterator<Item = &TileNode> + '_ {
        self.children.values()
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut TileNode> + '_ {
        self.children.values_mut()
    }

    /// Number of indexed tiles.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn max_tile_id(&self) -> Option<TileId> {
        self.children.keys().next_back().copied()
    }

    pub fn props(&self) -> &[PropInstance] {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut [PropInstance] {
        &mut self.props
    }

    pub fn push_prop(&mut self, prop: PropInstance) {
        self.props.push(prop);
    }

    /// Empties the store, handing back everything it owned.
    pub fn drain(&mut self) -> (Vec<TileNode>, Vec<PropInstance>) {
        self.index.clear();
        let tiles = std::mem::take(&mut self.children).into_values().collect();
        (tiles, std::mem::take(&mut self.props))
    }
}

impl LayerView for LayerStore {
    fn tile(&self, coord: GridCoord) -> Option<&TileNode> {
        self.tile_id(coord).and_then(|id| self.get(id))
    }
}

/// View over a store through an arbitrary coordinate map, e.g. the
/// current-layer cache.
#[derive(Clone, Copy, Debug)]
pub struct LayerLookup<'a> {
    keys: &'a BTreeMap<GridCoord, TileId>,
    store: &'a LayerStore,
}

impl<'a> LayerLookup<'a> {
    pub fn new(keys: &'a BTreeMap<GridCoord, TileId>, store: &'a LayerStore) -> Self {
        Self { keys, store }
    }

    pub fn store(&self) -> &'a LayerStore {
        self.store
    }

    /// Like [`LayerView::tile`], but borrowing from the store rather than the view.
    pub fn node(&self, coord: GridCoord) -> Option<&'a TileNode> {
        let store = self.store;
        self.keys.get(&coord).and_then(|id| store.get(*id))
    }

    pub fn entries(&self) -> impl Iterator<Item = (GridCoord, TileId)> + 'a {
        self.keys.iter().map(|(coord, id)| (*coord, *id))
    }
}

impl LayerView for LayerLookup<'_> {
    fn tile(&self, coord: GridCoord) -> Option<&TileNode> {
        self.node(coord)
    }
}

/// Cached coordinate map of the active level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CurrentLayer {
    level: Level,
    tiles: BTreeMap<GridCoord, TileId>,
}

impl CurrentLayer {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            tiles: BTreeMap::new(),
        }
    }

    /// Cache of `level`, copied from the store's index when the level exists.
    pub fn from_store(level: Level, store: Option<&LayerStore>) -> Self {
        Self {
            level,
            tiles: store.map(|store| store.index().clone()).unwrap_or_default(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn tiles(&self) -> &BTreeMap<GridCoord, TileId> {
        &self.tiles
    }

    pub fn get(&self, coord: GridCoord) -> Option<TileId> {
        self.tiles.get(&coord).copied()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Skips the insert when `coord` is already cached.
    pub fn insert(&mut self, coord: GridCoord, id: TileId) -> bool {
        if self.tiles.contains_key(&coord) {
            return false;
        }
        self.tiles.insert(coord, id);
        true
    }

    pub fn remove(&mut self, coord: GridCoord) -> Option<TileId> {
        self.tiles.remove(&coord)
    }

    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.tiles.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64, x: i32, z: i32) -> TileNode {
        TileNode::new(TileId(id), GridCoord::new(x, z))
    }

    #[test]
    fn dictionary_ops_are_guarded() {
        let mut store = LayerStore::new(Level(1));
        let at = GridCoord::new(0, 0);

        assert!(store.add_tile_to_dictionary(at, TileId(1)));
        assert!(!store.add_tile_to_dictionary(at, TileId(2)));
        assert_eq!(store.tile_id(at), Some(TileId(1)));

        assert_eq!(store.remove_tile_from_dictionary(at), Some(TileId(1)));
        assert_eq!(store.remove_tile_from_dictionary(at), None);
    }

    #[test]
    fn rebuild_index_scans_children() {
        let mut store = LayerStore::from_children(
            Level(2),
            [node(1, 0, 0), node(2, 1, 0), node(3, 0, 1)],
            Vec::new(),
        );
        assert!(store.is_empty());

        store.rebuild_index().unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.tile_id(GridCoord::new(1, 0)), Some(TileId(2)));
        assert!(store.contains(GridCoord::new(0, 1)));
        assert_eq!(store.max_tile_id(), Some(TileId(3)));
    }

    #[test]
    fn duplicate_children_are_reported() {
        let mut store =
            LayerStore::from_children(Level(0), [node(4, 2, 2), node(7, 2, 2)], Vec::new());

        let error = store.rebuild_index().unwrap_err();
        assert_eq!(
            error,
            TerrainError::DuplicateCoordinate {
                level: Level(0),
                coord: GridCoord::new(2, 2),
                existing: TileId(4),
                duplicate: TileId(7),
            }
        );
        assert!(store.is_empty());
    }

    #[test]
    fn lookup_reads_through_foreign_keys() {
        let mut store = LayerStore::from_children(Level(1), [node(1, 0, 0)], Vec::new());
        store.rebuild_index().unwrap();

        let mut keys = BTreeMap::new();
        keys.insert(GridCoord::new(5, 5), TileId(1));
        keys.insert(GridCoord::new(6, 6), TileId(99));
        let lookup = LayerLookup::new(&keys, &store);

        assert!(lookup.contains(GridCoord::new(5, 5)));
        assert!(!lookup.contains(GridCoord::ORIGIN));
        assert!(!lookup.contains(GridCoord::new(6, 6)));
        assert_eq!(lookup.entries().count(), 2);
    }

    #[test]
    fn current_layer_copies_the_store_index() {
        let mut store =
            LayerStore::from_children(Level(3), [node(1, 0, 0), node(2, 0, 1)], Vec::new());
        store.rebuild_index().unwrap();

        let mut current = CurrentLayer::from_store(Level(3), Some(&store));
        assert_eq!(current.len(), 2);
        assert!(!current.insert(GridCoord::ORIGIN, TileId(9)));
        assert_eq!(current.get(GridCoord::ORIGIN), Some(TileId(1)));

        let empty = CurrentLayer::from_store(Level(4), None);
        assert!(empty.is_empty());
        assert_eq!(empty.level(), Level(4));
    }

    #[test]
    fn drain_hands_back_everything() {
        let mut store = LayerStore::from_children(Level(1), [node(1, 0, 0)], Vec::new());
        store.rebuild_index().unwrap();
        store.push_prop(PropInstance::new(
            crate::props::PropId(0),
            crate::props::WorldPoint::default(),
        ));

        let (tiles, props) = store.drain();
        assert_eq!(tiles.len(), 1);
        assert_eq!(props.len(), 1);
        assert!(store.is_empty());
        assert!(store.props().is_empty());
    }
}
