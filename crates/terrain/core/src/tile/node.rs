use arrayvec::ArrayVec;

use crate::error::Result;
use crate::grid::{GridCoord, GridOffset, Level, TileDirection};
use crate::host::{TileVisual, VisualHost, VisualId};
use crate::layer::{LayerView, TileId};
use crate::path::{AtlasCell, PathIndexTable};
use crate::refresh::RefreshFlags;

use super::weights::NeighborWeights;
use super::{TileVariant, VariantCatalog, Yaw};

type NeighborSlots = ArrayVec<GridCoord, 4>;

/// Occupied neighbours of a tile, keyed by absolute coordinate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighborhood {
    immediate: NeighborSlots,
    corners: NeighborSlots,
    facing: GridOffset,
    direction: TileDirection,
}

impl Neighborhood {
    /// Resolves the occupied neighbours of `coord` in `view`.
    ///
    /// Every occupied immediate neighbour pulls the facing vector away from
    /// itself, so a tile with one open side faces that side and opposite
    /// neighbours cancel out.
    pub fn resolve<V>(coord: GridCoord, view: &V) -> Self
    where
        V: LayerView + ?Sized,
    {
        let mut neighborhood = Self::default();

        for offset in GridOffset::IMMEDIATE {
            let Some(at) = coord.checked_add(offset) else {
                continue;
            };
            if view.contains(at) && Self::register(&mut neighborhood.immediate, at) {
                neighborhood.facing -= offset;
            }
        }
        neighborhood.direction = TileDirection::classify(neighborhood.facing);

        for offset in GridOffset::CORNERS {
            let Some(at) = coord.checked_add(offset) else {
                continue;
            };
            if view.contains(at) {
                Self::register(&mut neighborhood.corners, at);
            }
        }

        neighborhood
    }

    /// First registration per coordinate wins.
    fn register(slots: &mut NeighborSlots, at: GridCoord) -> bool {
        if slots.contains(&at) {
            return false;
        }
        slots.try_push(at).is_ok()
    }

    /// Occupied axis-aligned neighbours, in west, east, south, north order.
    pub fn immediate(&self) -> &[GridCoord] {
        &self.immediate
    }

    pub fn corners(&self) -> &[GridCoord] {
        &self.corners
    }

    pub fn facing(&self) -> GridOffset {
        self.facing
    }

    pub fn direction(&self) -> TileDirection {
        self.direction
    }

    /// Two neighbours on opposite sides.
    pub fn is_straight_run(&self) -> bool {
        self.immediate.len() == 2 && self.facing.is_zero()
    }
}

/// Everything a tile needs to (re)build its visual.
pub struct RebuildContext<'a, H: VisualHost + ?Sized> {
    pub level: Level,
    pub catalog: &'a VariantCatalog,
    pub table: &'a PathIndexTable,
    pub host: &'a mut H,
    pub build_top_only: bool,
}

/// State of a single grid cell.
///
/// Variant and yaw are only ever derived from the neighbourhood inside
/// [`TileNode::initialize`] / [`TileNode::update_variant`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileNode {
    id: TileId,
    coord: GridCoord,
    neighborhood: Neighborhood,
    weights: NeighborWeights,
    variant: TileVariant,
    yaw: Yaw,
    path_texture: Option<u32>,
    blend_index: u32,
    needs_repaint: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    visual: Option<VisualId>,
}

impl TileNode {
    pub fn new(id: TileId, coord: GridCoord) -> Self {
        Self {
            id,
            coord,
            neighborhood: Neighborhood::default(),
            weights: NeighborWeights::default(),
            variant: TileVariant::SinglePiece,
            yaw: Yaw::Deg0,
            path_texture: Some(0),
            blend_index: 0,
            needs_repaint: false,
            visual: None,
        }
    }

    /// Seeds the painted index, e.g. when rebuilding persisted tiles.
    pub fn with_path_texture(mut self, path_texture: Option<u32>) -> Self {
        self.path_texture = path_texture;
        self
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn neighborhood(&self) -> &Neighborhood {
        &self.neighborhood
    }

    pub fn weights(&self) -> &NeighborWeights {
        &self.weights
    }

    pub fn variant(&self) -> TileVariant {
        self.variant
    }

    pub fn yaw(&self) -> Yaw {
        self.yaw
    }

    pub fn direction(&self) -> TileDirection {
        self.neighborhood.direction
    }

    /// Painted path texture index; `None` when the tile is not paintable.
    pub fn path_texture(&self) -> Option<u32> {
        self.path_texture
    }

    pub fn is_paintable(&self) -> bool {
        self.path_texture.is_some()
    }

    pub fn blend_index(&self) -> u32 {
        self.blend_index
    }

    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    pub fn visual(&self) -> Option<VisualId> {
        self.visual
    }

    /// Adopts a freshly resolved neighbourhood and rebuilds the variant.
    ///
    /// Path weights are dropped; they are recomputed by the next path paint.
    pub fn initialize<H>(
        &mut self,
        neighborhood: Neighborhood,
        ctx: &mut RebuildContext<'_, H>,
    ) -> Result<RefreshFlags>
    where
        H: VisualHost + ?Sized,
    {
        self.neighborhood = neighborhood;
        self.weights.clear();
        self.update_variant(ctx)
    }

    /// Re-selects variant and yaw from the stored neighbourhood and respawns
    /// the visual.
    pub fn update_variant<H>(&mut self, ctx: &mut RebuildContext<'_, H>) -> Result<RefreshFlags>
    where
        H: VisualHost + ?Sized,
    {
        let variant = TileVariant::select(
            self.neighborhood.immediate.len(),
            self.neighborhood.facing,
            ctx.build_top_only,
        );
        let catalog = ctx.catalog;
        let asset = catalog.require(variant)?;

        self.variant = variant;
        self.yaw = Yaw::resolve(&self.neighborhood);
        self.path_texture = if variant.is_paintable() {
            Some(self.path_texture.unwrap_or(0))
        } else {
            None
        };

        if let Some(previous) = self.visual.take() {
            ctx.host.destroy(previous);
        }
        let visual = ctx.host.spawn_tile(TileVisual {
            level: ctx.level,
            coord: self.coord,
            variant,
            yaw: self.yaw,
            asset,
        })?;
        self.visual = Some(visual);

        let mut flags = RefreshFlags::MESH;
        if self.path_texture.is_some_and(|texture| texture > 0)
            && self.paint_path_texture(true, ctx.table, &mut *ctx.host)?
        {
            flags |= RefreshFlags::TEXTURE;
        }
        Ok(flags)
    }

    /// Sets the painted path index. Returns false for unpaintable tiles.
    pub fn set_path_texture(&mut self, index: u32) -> bool {
        match self.path_texture.as_mut() {
            Some(texture) => {
                *texture = index;
                true
            }
            None => false,
        }
    }

    pub fn replace_weights(&mut self, weights: NeighborWeights) {
        self.weights = weights;
    }

    /// Stores a new blend index, flagging a repaint when it changed.
    pub fn apply_blend_index(&mut self, blend_index: u32) {
        if blend_index != self.blend_index {
            self.needs_repaint = true;
        }
        self.blend_index = blend_index;
    }

    /// Rewrites the top quad UVs from the path table.
    ///
    /// Does nothing unless a repaint is pending or `force` is set. A blend
    /// index outside the table keeps the old texture and the pending flag.
    pub fn paint_path_texture<H>(
        &mut self,
        force: bool,
        table: &PathIndexTable,
        host: &mut H,
    ) -> Result<bool>
    where
        H: VisualHost + ?Sized,
    {
        if !self.needs_repaint && !force {
            return Ok(false);
        }

        let Some(cell) = table.cell_for(self.blend_index) else {
            tracing::trace!(
                coord = %self.coord,
                blend = self.blend_index,
                "blend index has no atlas cell"
            );
            return Ok(false);
        };
        let Some(visual) = self.visual else {
            return Ok(false);
        };

        let quad = AtlasCell::from_index(cell).uv_rect().quad();
        host.apply_path_uv(visual, &quad)?;
        self.needs_repaint = false;
        Ok(true)
    }

    /// Drops the handle without touching the host, e.g. for handles restored
    /// from another session.
    pub fn forget_visual(&mut self) {
        self.visual = None;
    }

    /// Destroys the visual, if any.
    pub fn release_visual<H>(&mut self, host: &mut H)
    where
        H: VisualHost + ?Sized,
    {
        if let Some(visual) = self.visual.take() {
            host.destroy(visual);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::host::{HeadlessHost, HeadlessVisual};

    struct Cells(BTreeMap<GridCoord, TileNode>);

    impl Cells {
        fn new(coords: &[(i32, i32)]) -> Self {
            Self(
                coords
                    .iter()
                    .enumerate()
                    .map(|(index, (x, z))| {
                        let coord = GridCoord::new(*x, *z);
                        (coord, TileNode::new(TileId(index as u64), coord))
                    })
                    .collect(),
            )
        }
    }

    impl LayerView for Cells {
        fn tile(&self, coord: GridCoord) -> Option<&TileNode> {
            self.0.get(&coord)
        }
    }

    fn catalog() -> VariantCatalog {
        TileVariant::ALL
            .into_iter()
            .map(|variant| (variant, variant.to_string()))
            .collect()
    }

    fn initialized(cells: &Cells, at: (i32, i32), host: &mut HeadlessHost) -> TileNode {
        let coord = GridCoord::new(at.0, at.1);
        let mut node = cells.tile(coord).cloned().unwrap();
        let catalog = catalog();
        let mut ctx = RebuildContext {
            level: Level::DEFAULT,
            catalog: &catalog,
            table: PathIndexTable::shared(),
            host,
            build_top_only: false,
        };
        node.initialize(Neighborhood::resolve(coord, cells), &mut ctx)
            .unwrap();
        node
    }

    #[test]
    fn isolated_tile_is_a_single_piece() {
        let cells = Cells::new(&[(0, 0)]);
        let mut host = HeadlessHost::new();
        let node = initialized(&cells, (0, 0), &mut host);

        assert_eq!(node.variant(), TileVariant::SinglePiece);
        assert_eq!(node.yaw(), Yaw::Deg0);
        assert_eq!(node.direction(), TileDirection::None);
        assert!(!node.is_paintable());
    }

    #[test]
    fn lone_neighbor_faces_away_from_it() {
        let cells = Cells::new(&[(0, 0), (-1, 0)]);
        let mut host = HeadlessHost::new();
        let node = initialized(&cells, (0, 0), &mut host);

        assert_eq!(node.variant(), TileVariant::TripleEdge);
        assert_eq!(node.direction(), TileDirection::East);
        assert_eq!(node.yaw(), Yaw::Deg270);
    }

    #[test]
    fn neighbours_past_the_grid_edge_are_skipped() {
        let cells = Cells::new(&[(i32::MAX, i32::MIN), (i32::MAX - 1, i32::MIN)]);
        let neighborhood = Neighborhood::resolve(GridCoord::new(i32::MAX, i32::MIN), &cells);

        assert_eq!(
            neighborhood.immediate(),
            &[GridCoord::new(i32::MAX - 1, i32::MIN)]
        );
        assert!(neighborhood.corners().is_empty());
        assert_eq!(neighborhood.direction(), TileDirection::East);
    }

    #[test]
    fn straight_runs_rotate_by_axis() {
        let cells = Cells::new(&[(-1, 0), (0, 0), (1, 0)]);
        let mut host = HeadlessHost::new();
        let node = initialized(&cells, (0, 0), &mut host);
        assert_eq!(node.variant(), TileVariant::DoubleEdge);
        assert!(node.neighborhood().is_straight_run());
        assert_eq!(node.yaw(), Yaw::Deg90);

        let cells = Cells::new(&[(0, -1), (0, 0), (0, 1)]);
        let node = initialized(&cells, (0, 0), &mut host);
        assert_eq!(node.variant(), TileVariant::DoubleEdge);
        assert_eq!(node.yaw(), Yaw::Deg0);
    }

    #[test]
    fn adjacent_sides_form_a_corner() {
        let cells = Cells::new(&[(0, 0), (1, 0), (0, 1)]);
        let mut host = HeadlessHost::new();
        let node = initialized(&cells, (0, 0), &mut host);

        assert_eq!(node.variant(), TileVariant::Corner);
        assert_eq!(node.direction(), TileDirection::SouthWest);
        assert_eq!(node.yaw(), Yaw::Deg90);
    }

    #[test]
    fn three_neighbors_face_the_open_side() {
        let cells = Cells::new(&[(0, 0), (-1, 0), (1, 0), (0, -1)]);
        let mut host = HeadlessHost::new();
        let node = initialized(&cells, (0, 0), &mut host);

        assert_eq!(node.variant(), TileVariant::SingleEdge);
        assert_eq!(node.direction(), TileDirection::North);
        assert_eq!(node.yaw(), Yaw::Deg180);
    }

    #[test]
    fn surrounded_tile_is_a_paintable_top() {
        let cells = Cells::new(&[(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1), (1, 1)]);
        let mut host = HeadlessHost::new();
        let node = initialized(&cells, (0, 0), &mut host);

        assert_eq!(node.variant(), TileVariant::Top);
        assert_eq!(node.path_texture(), Some(0));
        assert_eq!(node.neighborhood().corners(), &[GridCoord::new(1, 1)]);

        let visual = node.visual().unwrap();
        assert!(matches!(
            host.visual(visual),
            Some(HeadlessVisual::Tile {
                variant: TileVariant::Top,
                ..
            })
        ));
    }

    #[test]
    fn reinitializing_replaces_the_visual() {
        let cells = Cells::new(&[(0, 0)]);
        let mut host = HeadlessHost::new();
        let mut node = initialized(&cells, (0, 0), &mut host);
        let first = node.visual().unwrap();

        let catalog = catalog();
        let mut ctx = RebuildContext {
            level: Level::DEFAULT,
            catalog: &catalog,
            table: PathIndexTable::shared(),
            host: &mut host,
            build_top_only: true,
        };
        node.update_variant(&mut ctx).unwrap();

        assert_ne!(node.visual(), Some(first));
        assert!(host.visual(first).is_none());
        assert_eq!(host.live_count(), 1);
        assert_eq!(node.variant(), TileVariant::Top);
    }

    #[test]
    fn unpaintable_tiles_reject_path_texture() {
        let mut node = TileNode::new(TileId(0), GridCoord::ORIGIN);
        node.path_texture = None;
        assert!(!node.set_path_texture(1));
        assert_eq!(node.path_texture(), None);
    }

    #[test]
    fn lookup_miss_keeps_pending_repaint() {
        let mut host = HeadlessHost::new();
        let mut node = TileNode::new(TileId(0), GridCoord::ORIGIN);
        node.visual = Some(
            host.spawn_tile(TileVisual {
                level: Level::DEFAULT,
                coord: GridCoord::ORIGIN,
                variant: TileVariant::Top,
                yaw: Yaw::Deg0,
                asset: "top",
            })
            .unwrap(),
        );

        node.apply_blend_index(32);
        assert!(node.needs_repaint());
        let painted = node
            .paint_path_texture(false, PathIndexTable::shared(), &mut host)
            .unwrap();
        assert!(!painted);
        assert!(node.needs_repaint());

        node.apply_blend_index(4);
        let painted = node
            .paint_path_texture(false, PathIndexTable::shared(), &mut host)
            .unwrap();
        assert!(painted);
        assert!(!node.needs_repaint());
        assert_eq!(host.stats().uv_rebuilds, 1);
    }
}
