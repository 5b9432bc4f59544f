//! Per-cycle grid snapshot message.

use serde::{Deserialize, Serialize};

use crate::core::types::{Header, Point2D};
use crate::grid::geometry::GridGeometry;

/// One finished egocentric grid, emitted once per scan.
///
/// The header's `stamp_us` is the producing scan's timestamp and
/// `frame_id` is the body frame the cells are expressed in. Cells are a
/// row-major copy taken after the path pass, so the grid it came from is
/// free to be reset for the next cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Sequence, scan stamp and body frame
    pub header: Header,
    /// Grid dimensions and scale
    pub geometry: GridGeometry,
    /// Body-frame position of the lower-left cell corner
    pub origin: Point2D,
    /// Row-major cell values
    pub cells: Vec<i8>,
}

impl GridSnapshot {
    /// Read a cell by (col, row), `None` outside the grid.
    pub fn value_at(&self, col: u32, row: u32) -> Option<i8> {
        if col >= self.geometry.width || row >= self.geometry.height {
            return None;
        }
        self.cells
            .get(row as usize * self.geometry.width as usize + col as usize)
            .copied()
    }

    /// Number of cells holding a given value.
    pub fn count_value(&self, value: i8) -> usize {
        self.cells.iter().filter(|&&v| v == value).count()
    }
}
