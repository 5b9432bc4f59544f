//! Planar range scan delivered by the sensor feed.

use serde::{Deserialize, Serialize};

/// One full revolution (or sector) of range readings from a planar lidar.
///
/// Rays are uniformly spaced: ray `i` points along
/// `angle_min + i * angle_increment` in the sensor frame. Ranges are in
/// meters; a reading is usable only if it is finite and strictly inside
/// `(range_min, range_max)` — sensors report the limits themselves for
/// no-return and saturated rays, so the exact limit values carry no
/// obstacle information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Bearing of ray 0 in radians
    pub angle_min: f32,
    /// Angular spacing between consecutive rays in radians
    pub angle_increment: f32,
    /// Lower range limit in meters (exclusive)
    pub range_min: f32,
    /// Upper range limit in meters (exclusive)
    pub range_max: f32,
    /// Range readings in meters, one per ray
    pub ranges: Vec<f32>,
    /// Frame the rays are expressed in
    pub frame_id: String,
    /// Acquisition time in microseconds
    pub stamp_us: u64,
}

impl LaserScan {
    /// Create a scan from its field values.
    pub fn new(
        angle_min: f32,
        angle_increment: f32,
        range_min: f32,
        range_max: f32,
        ranges: Vec<f32>,
        frame_id: impl Into<String>,
        stamp_us: u64,
    ) -> Self {
        Self {
            angle_min,
            angle_increment,
            range_min,
            range_max,
            ranges,
            frame_id: frame_id.into(),
            stamp_us,
        }
    }

    /// Number of rays in the scan.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True if the scan carries no rays.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Bearing of ray `i` in radians.
    #[inline]
    pub fn angle_at(&self, i: usize) -> f32 {
        self.angle_min + i as f32 * self.angle_increment
    }

    /// Whether a range reading is usable: finite and strictly inside
    /// `(range_min, range_max)`.
    #[inline]
    pub fn is_valid_range(&self, range: f32) -> bool {
        range.is_finite() && range > self.range_min && range < self.range_max
    }

    /// Iterate over `(angle, range)` pairs for every ray.
    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.ranges
            .iter()
            .enumerate()
            .map(|(i, &r)| (self.angle_at(i), r))
    }

    /// Iterate over `(angle, range)` pairs for valid rays only.
    pub fn iter_valid(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.iter().filter(|&(_, r)| self.is_valid_range(r))
    }

    /// Number of valid range readings.
    pub fn valid_count(&self) -> usize {
        self.ranges
            .iter()
            .filter(|&&r| self.is_valid_range(r))
            .count()
    }
}
