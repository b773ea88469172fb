//! Path blend weights.
//!
//! Edge neighbours weigh in with their own painted index. A diagonal
//! neighbour weighs 1 only when the 2×2 block it closes with this tile sums
//! to exactly 4, i.e. all four cells are painted with index 1; any other block
//! weighs 0. The blend index is then
//! `own_index * Σ bit(direction) * neighbour_index * weight(direction)` over
//! the eight surrounding paintable cells.
//!
//! See <http://www.cr31.co.uk/stagecast/wang/blob.html> for the blob tile set
//! the atlas follows.
use crate::grid::{GridCoord, GridOffset, TileDirection};
use crate::layer::LayerView;

use super::TileNode;

/// Block sum that makes a diagonal count as connected.
const CONNECTED_CORNER_SUM: i64 = 4;

/// Per-direction weights, indexed by [`TileDirection::slot`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborWeights([Option<u32>; 8]);

impl NeighborWeights {
    /// Computes the weights of the paintable neighbours of `coord`.
    pub fn compute<V>(coord: GridCoord, view: &V) -> Self
    where
        V: LayerView + ?Sized,
    {
        let mut weights = Self::default();

        for offset in GridOffset::IMMEDIATE {
            if let Some(texture) = paintable_near(view, coord, offset) {
                weights.insert_first(TileDirection::classify(offset), texture);
            }
        }

        for offset in GridOffset::CORNERS {
            if paintable_near(view, coord, offset).is_none() {
                continue;
            }
            let block = [
                offset,
                GridOffset::new(0, offset.dz),
                GridOffset::new(offset.dx, 0),
                GridOffset::ZERO,
            ];
            let sum: i64 = block
                .iter()
                .filter_map(|cell| coord.checked_add(*cell).and_then(|at| view.tile(at)))
                .map(texture_value)
                .sum();
            let weight = u32::from(sum == CONNECTED_CORNER_SUM);
            weights.insert_first(TileDirection::classify(offset), weight);
        }

        weights
    }

    /// Weight recorded for `direction`, zero when none was recorded.
    pub fn get(&self, direction: TileDirection) -> u32 {
        direction
            .slot()
            .and_then(|slot| self.0[slot])
            .unwrap_or(0)
    }

    pub fn is_recorded(&self, direction: TileDirection) -> bool {
        direction.slot().is_some_and(|slot| self.0[slot].is_some())
    }

    pub fn clear(&mut self) {
        self.0 = [None; 8];
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    fn insert_first(&mut self, direction: TileDirection, weight: u32) {
        if let Some(slot) = direction.slot() {
            self.0[slot].get_or_insert(weight);
        }
    }
}

/// Blend index of a tile painted with `own_texture`, or `None` when the tile
/// is not paintable.
pub fn blend_index<V>(
    coord: GridCoord,
    own_texture: Option<u32>,
    weights: &NeighborWeights,
    view: &V,
) -> Option<u32>
where
    V: LayerView + ?Sized,
{
    let own_texture = own_texture?;

    let total = TileDirection::SURROUNDING
        .iter()
        .filter_map(|direction| {
            let texture = paintable_near(view, coord, direction.offset())?;
            Some(
                direction
                    .bit()
                    .saturating_mul(texture)
                    .saturating_mul(weights.get(*direction)),
            )
        })
        .fold(0u32, u32::saturating_add);

    Some(total.saturating_mul(own_texture))
}

fn paintable_at<V>(view: &V, coord: GridCoord) -> Option<u32>
where
    V: LayerView + ?Sized,
{
    view.tile(coord).and_then(TileNode::path_texture)
}

fn paintable_near<V>(view: &V, coord: GridCoord, offset: GridOffset) -> Option<u32>
where
    V: LayerView + ?Sized,
{
    paintable_at(view, coord.checked_add(offset)?)
}

/// Painted index as a signed value; unpaintable tiles count as -1.
fn texture_value(node: &TileNode) -> i64 {
    node.path_texture().map_or(-1, i64::from)
}
