use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::TerrainConfig;

/// Canonical blend indices, listed in atlas order (row-major, top row first).
///
/// Entry `i` is drawn by atlas cell `i`. The list is part of the texture
/// contract: reordering it re-maps every painted path.
const CANONICAL_BLENDS: [u32; TerrainConfig::PATH_TABLE_LEN] = [
    20, 68, 92, 112, 28, 124, 116, 80, //
    21, 84, 87, 221, 127, 255, 241, 17, //
    29, 117, 85, 95, 247, 215, 209, 1, //
    23, 213, 81, 31, 253, 125, 113, 16, //
    5, 69, 93, 119, 223, 256, 245, 65, //
    0, 4, 71, 193, 7, 199, 197, 64,
];

static SHARED: OnceLock<PathIndexTable> = OnceLock::new();

/// Read-only lookup from blend index to atlas cell index.
#[derive(Clone, Debug)]
pub struct PathIndexTable {
    cells: HashMap<u32, usize>,
}

impl PathIndexTable {
    /// Returns the process-wide table, building it on first use.
    pub fn shared() -> &'static PathIndexTable {
        SHARED.get_or_init(Self::build)
    }

    fn build() -> Self {
        let mut cells = HashMap::with_capacity(CANONICAL_BLENDS.len());
        for (cell, blend) in CANONICAL_BLENDS.iter().enumerate() {
            cells.entry(*blend).or_insert(cell);
        }
        Self { cells }
    }

    /// Atlas cell drawing `blend`, or `None` for unsupported combinations.
    pub fn cell_for(&self, blend: u32) -> Option<usize> {
        self.cells.get(&blend).copied()
    }

    pub fn contains(&self, blend: u32) -> bool {
        self.cells.contains_key(&blend)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The canonical blend list in atlas order.
    pub fn canonical() -> &'static [u32] {
        &CANONICAL_BLENDS
    }
}
