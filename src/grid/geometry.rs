//! Grid geometry and its provider seam.

use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

/// Dimensions and scale of the egocentric grid.
///
/// Fixed for the life of a builder: queried once from the
/// [`CostmapGeometry`] provider when the first scan arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Cell columns
    pub width: u32,
    /// Cell rows
    pub height: u32,
    /// Cell edge length in meters
    pub resolution: f32,
}

impl GridGeometry {
    /// Create a geometry.
    pub fn new(width: u32, height: u32, resolution: f32) -> Self {
        Self {
            width,
            height,
            resolution,
        }
    }

    /// Metric side length along X.
    #[inline]
    pub fn size_x(&self) -> f32 {
        self.width as f32 * self.resolution
    }

    /// Metric side length along Y.
    #[inline]
    pub fn size_y(&self) -> f32 {
        self.height as f32 * self.resolution
    }

    /// Body-frame position of the lower-left cell corner when the grid
    /// is centered on the body.
    #[inline]
    pub fn centered_origin(&self) -> Point2D {
        Point2D::new(-self.size_x() / 2.0, -self.size_y() / 2.0)
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Source of the grid geometry, asked exactly once at lazy grid
/// initialization.
///
/// Hosts embedding the builder into a costmap stack implement this over
/// their live costmap; a plain [`GridGeometry`] works for the static
/// case.
pub trait CostmapGeometry {
    /// The geometry the grid should be allocated with.
    fn geometry(&self) -> GridGeometry;
}

impl CostmapGeometry for GridGeometry {
    fn geometry(&self) -> GridGeometry {
        *self
    }
}
