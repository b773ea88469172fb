//! Tile node state: neighbour resolution, variant selection and path weights.
mod node;
mod variant;
pub mod weights;

pub use node::{Neighborhood, RebuildContext, TileNode};
pub use variant::{TileVariant, VariantCatalog, Yaw};
pub use weights::NeighborWeights;
