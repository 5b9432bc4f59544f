//! Fixed-size occupancy grid centered on the robot body.

use crate::core::types::Point2D;
use crate::grid::cell;
use crate::grid::geometry::GridGeometry;

/// Row-major i8 grid re-centered on the body frame every cycle.
///
/// Index layout is `row * width + col` with cell (0, 0) at the origin
/// corner. Metric coordinates map to cells through
/// [`cell_index`](EgoGrid::cell_index):
///
/// ```text
/// col = round(((x - origin_x) / size_x) * width  - 0.5)
/// row = round(((y - origin_y) / size_y) * height - 0.5)
/// ```
///
/// with half-away-from-zero rounding. Points whose col or row falls
/// outside the grid are dropped, not clamped; within a cycle later
/// writes overwrite earlier ones.
#[derive(Debug, Clone)]
pub struct EgoGrid {
    geometry: GridGeometry,
    origin: Point2D,
    cells: Vec<i8>,
}

impl EgoGrid {
    /// Allocate a grid with the centered origin, all cells unknown.
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            origin: geometry.centered_origin(),
            cells: vec![cell::UNKNOWN; geometry.cell_count()],
        }
    }

    /// The fixed geometry.
    #[inline]
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// Body-frame position of the lower-left cell corner.
    #[inline]
    pub fn origin(&self) -> Point2D {
        self.origin
    }

    /// Row-major view of the cells.
    #[inline]
    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    /// Fill every cell with unknown. Idempotent, keeps the allocation.
    pub fn reset(&mut self) {
        self.cells.fill(cell::UNKNOWN);
    }

    /// Map a body-frame point to its (col, row) cell, `None` if the
    /// point is non-finite or lands outside the grid.
    pub fn cell_index(&self, point: Point2D) -> Option<(u32, u32)> {
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        let g = &self.geometry;
        let col = (((point.x - self.origin.x) / g.size_x()) * g.width as f32 - 0.5).round() as i64;
        let row = (((point.y - self.origin.y) / g.size_y()) * g.height as f32 - 0.5).round() as i64;
        if col < 0 || row < 0 || col >= i64::from(g.width) || row >= i64::from(g.height) {
            return None;
        }
        Some((col as u32, row as u32))
    }

    /// Rasterize one point. Returns false when the point was dropped.
    pub fn paint(&mut self, point: Point2D, value: i8) -> bool {
        match self.cell_index(point) {
            Some((col, row)) => {
                self.set_cell(col, row, value);
                true
            }
            None => false,
        }
    }

    /// Write a cell by index. Indices must come from
    /// [`cell_index`](EgoGrid::cell_index).
    pub fn set_cell(&mut self, col: u32, row: u32, value: i8) {
        debug_assert!(col < self.geometry.width && row < self.geometry.height);
        let idx = row as usize * self.geometry.width as usize + col as usize;
        if let Some(c) = self.cells.get_mut(idx) {
            *c = value;
        }
    }

    /// Read a cell by index, `None` outside the grid.
    pub fn value_at(&self, col: u32, row: u32) -> Option<i8> {
        if col >= self.geometry.width || row >= self.geometry.height {
            return None;
        }
        self.cells
            .get(row as usize * self.geometry.width as usize + col as usize)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_grid() -> EgoGrid {
        // 80x80 cells at 5 cm: 4 m x 4 m, origin (-2, -2)
        EgoGrid::new(GridGeometry::new(80, 80, 0.05))
    }

    #[test]
    fn test_new_grid_is_all_unknown() {
        let grid = reference_grid();
        assert_eq!(grid.cells().len(), 6400);
        assert!(grid.cells().iter().all(|&v| v == cell::UNKNOWN));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut grid = reference_grid();
        grid.paint(Point2D::new(0.0, 0.0), cell::OCCUPIED);
        grid.paint(Point2D::new(0.5, 0.5), 25);

        grid.reset();
        assert!(grid.cells().iter().all(|&v| v == cell::UNKNOWN));
        grid.reset();
        assert!(grid.cells().iter().all(|&v| v == cell::UNKNOWN));
    }

    #[test]
    fn test_body_origin_maps_to_center_cell() {
        let grid = reference_grid();
        assert_eq!(grid.cell_index(Point2D::new(0.0, 0.0)), Some((40, 40)));
    }

    #[test]
    fn test_cell_centers_map_to_their_cell() {
        let grid = reference_grid();
        // Center of cell (0, 0) is origin + half a cell
        assert_eq!(grid.cell_index(Point2D::new(-1.975, -1.975)), Some((0, 0)));
        // Center of cell (79, 79)
        assert_eq!(grid.cell_index(Point2D::new(1.975, 1.975)), Some((79, 79)));
        // Center of cell (40, 40)
        assert_eq!(grid.cell_index(Point2D::new(0.025, 0.025)), Some((40, 40)));
    }

    #[test]
    fn test_grid_edges_fall_outside() {
        let grid = reference_grid();
        // The exact lower-left corner rounds to -1, the far edge to 80.
        assert_eq!(grid.cell_index(Point2D::new(-2.0, -2.0)), None);
        assert_eq!(grid.cell_index(Point2D::new(2.0, 0.0)), None);
        assert_eq!(grid.cell_index(Point2D::new(0.0, 2.0)), None);
        assert_eq!(grid.cell_index(Point2D::new(-2.5, 0.0)), None);
        assert_eq!(grid.cell_index(Point2D::new(0.0, 17.0)), None);
    }

    #[test]
    fn test_non_finite_points_dropped() {
        let mut grid = reference_grid();
        assert_eq!(grid.cell_index(Point2D::new(f32::NAN, 0.0)), None);
        assert_eq!(grid.cell_index(Point2D::new(0.0, f32::INFINITY)), None);
        assert!(!grid.paint(Point2D::new(f32::NAN, f32::NAN), cell::OCCUPIED));
        assert!(grid.cells().iter().all(|&v| v == cell::UNKNOWN));
    }

    #[test]
    fn test_later_writes_overwrite() {
        let mut grid = reference_grid();
        let p = Point2D::new(0.3, -0.7);
        assert!(grid.paint(p, cell::OCCUPIED));
        let (col, row) = grid.cell_index(p).unwrap();
        grid.set_cell(col, row, 25);
        assert_eq!(grid.value_at(col, row), Some(25));
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid = EgoGrid::new(GridGeometry::new(4, 3, 1.0));
        grid.set_cell(1, 2, 9);
        assert_eq!(grid.cells()[2 * 4 + 1], 9);
        assert_eq!(grid.value_at(1, 2), Some(9));
        assert_eq!(grid.value_at(4, 0), None);
        assert_eq!(grid.value_at(0, 3), None);
    }
}
