//! Rigid 2D frame-to-frame transforms.

use serde::{Deserialize, Serialize};

use crate::core::math::{angle_lerp, normalize_angle};
use crate::core::types::Point2D;

/// A rigid 2D transform mapping points from a source frame into a
/// destination frame.
///
/// Application order is translate-then-rotate: the offset is added to the
/// point first and the rotation acts on the shifted point.
///
/// ```text
/// x' = cos(yaw) * (x + tx) - sin(yaw) * (y + ty)
/// y' = sin(yaw) * (x + tx) + cos(yaw) * (y + ty)
/// ```
///
/// With `tx = -ox, ty = -oy, yaw = -otheta` this is exactly the change of
/// basis into the frame of an observer posed at `(ox, oy, otheta)` in the
/// source frame; see [`RigidTransform2D::into_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform2D {
    /// Translation along source X in meters
    pub tx: f32,
    /// Translation along source Y in meters
    pub ty: f32,
    /// Rotation in radians, normalized to [-π, π]
    pub yaw: f32,
}

impl RigidTransform2D {
    /// Create a transform with yaw normalized to [-π, π].
    #[inline]
    pub fn new(tx: f32, ty: f32, yaw: f32) -> Self {
        Self {
            tx,
            ty,
            yaw: normalize_angle(yaw),
        }
    }

    /// The identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            yaw: 0.0,
        }
    }

    /// Transform into the frame of an observer posed at `(x, y, theta)`
    /// in the source frame.
    #[inline]
    pub fn into_frame(x: f32, y: f32, theta: f32) -> Self {
        Self::new(-x, -y, -theta)
    }

    /// Map a point from the source frame into the destination frame.
    #[inline]
    pub fn apply(&self, point: Point2D) -> Point2D {
        let (sin_y, cos_y) = self.yaw.sin_cos();
        let sx = point.x + self.tx;
        let sy = point.y + self.ty;
        Point2D::new(cos_y * sx - sin_y * sy, sin_y * sx + cos_y * sy)
    }

    /// Interpolate between two timestamped transforms.
    ///
    /// Returns the transform at `target_us`, or `None` if `target_us`
    /// lies outside `[start, end]`. Translation interpolates linearly,
    /// yaw along the shortest arc.
    pub fn interpolate(
        start: &StampedTransform,
        end: &StampedTransform,
        target_us: u64,
    ) -> Option<RigidTransform2D> {
        if target_us < start.stamp_us || target_us > end.stamp_us {
            return None;
        }
        if start.stamp_us == end.stamp_us {
            return Some(start.transform);
        }

        let t = (target_us - start.stamp_us) as f32 / (end.stamp_us - start.stamp_us) as f32;
        let a = &start.transform;
        let b = &end.transform;
        Some(RigidTransform2D {
            tx: a.tx + t * (b.tx - a.tx),
            ty: a.ty + t * (b.ty - a.ty),
            yaw: angle_lerp(a.yaw, b.yaw, t),
        })
    }
}

impl Default for RigidTransform2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// A transform sample tagged with its acquisition time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StampedTransform {
    /// The transform value
    pub transform: RigidTransform2D,
    /// Acquisition time in microseconds
    pub stamp_us: u64,
}

impl StampedTransform {
    /// Tag a transform with a timestamp.
    #[inline]
    pub fn new(transform: RigidTransform2D, stamp_us: u64) -> Self {
        Self {
            transform,
            stamp_us,
        }
    }
}
