//! Egocentric occupancy grid: cell taxonomy, geometry, rasterization
//! and the per-cycle snapshot message.

pub mod cell;
pub mod ego_grid;
pub mod geometry;
pub mod snapshot;

pub use cell::CellClass;
pub use ego_grid::EgoGrid;
pub use geometry::{CostmapGeometry, GridGeometry};
pub use snapshot::GridSnapshot;
