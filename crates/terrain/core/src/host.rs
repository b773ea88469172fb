//! Boundary between the terrain core and the tool that owns visual objects.
//!
//! The core never manages object lifetimes itself: it asks the host to spawn a
//! visual for a variant, to rewrite the UVs of a flat top, and to destroy a
//! visual it no longer needs. [`HeadlessHost`] keeps everything in memory.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::ErrorSeverity;
use crate::grid::{GridCoord, Level};
use crate::path::UvQuad;
use crate::props::{PropId, WorldPoint};
use crate::tile::{TileVariant, Yaw};

/// Handle of a host-owned visual object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualId(pub u64);

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Request to instantiate the mesh of a tile variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileVisual<'a> {
    pub level: Level,
    pub coord: GridCoord,
    pub variant: TileVariant,
    pub yaw: Yaw,
    pub asset: &'a str,
}

/// Request to instantiate a scattered prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropVisual<'a> {
    pub level: Level,
    pub prop: PropId,
    pub position: WorldPoint,
    pub asset: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("asset `{asset}` could not be instantiated")]
    MissingAsset { asset: String },

    #[error("visual {0} is not alive")]
    UnknownVisual(VisualId),
}

impl HostError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingAsset { .. } => ErrorSeverity::Fatal,
            Self::UnknownVisual(_) => ErrorSeverity::Internal,
        }
    }
}

/// Visual object lifetime management provided by the host tool.
pub trait VisualHost {
    fn spawn_tile(&mut self, request: TileVisual<'_>) -> Result<VisualId, HostError>;

    fn spawn_prop(&mut self, request: PropVisual<'_>) -> Result<VisualId, HostError>;

    /// Rebuilds the top quad of `visual` with the given UVs.
    fn apply_path_uv(&mut self, visual: VisualId, quad: &UvQuad) -> Result<(), HostError>;

    fn destroy(&mut self, visual: VisualId);

    /// Highlights a freshly painted tile when path-paint debugging is on.
    fn mark_debug(&mut self, _visual: VisualId) {}
}

/// Visual object tracked by [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq)]
pub enum HeadlessVisual {
    Tile {
        level: Level,
        coord: GridCoord,
        variant: TileVariant,
        yaw: Yaw,
        asset: String,
        uv: Option<UvQuad>,
    },
    Prop {
        level: Level,
        prop: PropId,
        position: WorldPoint,
        asset: String,
    },
}

/// Counters of host calls, useful to assert how much work a mutation did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    pub spawned: usize,
    pub destroyed: usize,
    pub uv_rebuilds: usize,
}

/// In-memory host for headless tools and tests.
#[derive(Clone, Debug, Default)]
pub struct HeadlessHost {
    next_id: u64,
    visuals: BTreeMap<VisualId, HeadlessVisual>,
    debug_marked: BTreeSet<VisualId>,
    rejected_assets: BTreeSet<String>,
    stats: HostStats,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later spawn of `asset` fail, simulating a broken catalog entry.
    pub fn reject_asset(mut self, asset: impl Into<String>) -> Self {
        self.rejected_assets.insert(asset.into());
        self
    }

    pub fn visual(&self, id: VisualId) -> Option<&HeadlessVisual> {
        self.visuals.get(&id)
    }

    pub fn live_visuals(&self) -> impl Iterator<Item = (VisualId, &HeadlessVisual)> + '_ {
        self.visuals.iter().map(|(id, visual)| (*id, visual))
    }

    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_debug_marked(&self, id: VisualId) -> bool {
        self.debug_marked.contains(&id)
    }

    pub fn stats(&self) -> HostStats {
        self.stats
    }

    fn allocate(&mut self, asset: &str, visual: HeadlessVisual) -> Result<VisualId, HostError> {
        if self.rejected_assets.contains(asset) {
            return Err(HostError::MissingAsset {
                asset: asset.to_owned(),
            });
        }

        self.next_id += 1;
        let id = VisualId(self.next_id);
        self.visuals.insert(id, visual);
        self.stats.spawned += 1;
        Ok(id)
    }
}

impl VisualHost for HeadlessHost {
    fn spawn_tile(&mut self, request: TileVisual<'_>) -> Result<VisualId, HostError> {
        let visual = HeadlessVisual::Tile {
            level: request.level,
            coord: request.coord,
            variant: request.variant,
            yaw: request.yaw,
            asset: request.asset.to_owned(),
            uv: None,
        };
        self.allocate(request.asset, visual)
    }

    fn spawn_prop(&mut self, request: PropVisual<'_>) -> Result<VisualId, HostError> {
        let visual = HeadlessVisual::Prop {
            level: request.level,
            prop: request.prop,
            position: request.position,
            asset: request.asset.to_owned(),
        };
        self.allocate(request.asset, visual)
    }

    fn apply_path_uv(&mut self, visual: VisualId, quad: &UvQuad) -> Result<(), HostError> {
        match self.visuals.get_mut(&visual) {
            Some(HeadlessVisual::Tile { uv, .. }) => {
                *uv = Some(*quad);
                self.stats.uv_rebuilds += 1;
                Ok(())
            }
            _ => Err(HostError::UnknownVisual(visual)),
        }
    }

    fn destroy(&mut self, visual: VisualId) {
        if self.visuals.remove(&visual).is_some() {
            self.debug_marked.remove(&visual);
            self.stats.destroyed += 1;
        }
    }

    fn mark_debug(&mut self, visual: VisualId) {
        if self.visuals.contains_key(&visual) {
            self.debug_marked.insert(visual);
        }
    }
}
