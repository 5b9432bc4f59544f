//! Angular arithmetic shared by the frame-transform layer.

use std::f32::consts::PI;

/// Normalize angle to [-π, π].
///
/// # Example
/// ```
/// use drishti_grid::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Shortest signed angular difference from `a` to `b`.
///
/// Returns the angle to add to `a` to reach `b`, taking the short way
/// around the circle.
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}

/// Interpolate between two angles along the shortest arc.
///
/// `t` in [0, 1] maps to the sweep from `a` to `b`.
#[inline]
pub fn angle_lerp(a: f32, b: f32, t: f32) -> f32 {
    normalize_angle(a + angle_diff(a, b) * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_identity_range() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert_relative_eq!(normalize_angle(PI), PI);
        assert_relative_eq!(normalize_angle(-PI), -PI);
        assert_relative_eq!(normalize_angle(1.0), 1.0);
    }

    #[test]
    fn test_normalize_angle_wraps() {
        assert_relative_eq!(normalize_angle(2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(-2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(-3.0 * PI), -PI, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_angle_just_beyond_boundary() {
        let result = normalize_angle(PI + 0.001);
        assert!(result < 0.0, "should wrap to negative: {}", result);
        assert_relative_eq!(result, -PI + 0.001, epsilon = 1e-5);

        let result = normalize_angle(-PI - 0.001);
        assert!(result > 0.0, "should wrap to positive: {}", result);
        assert_relative_eq!(result, PI - 0.001, epsilon = 1e-5);
    }

    #[test]
    fn test_angle_diff_simple() {
        assert_relative_eq!(angle_diff(0.0, PI / 2.0), PI / 2.0);
        assert_relative_eq!(angle_diff(PI / 2.0, 0.0), -PI / 2.0);
        assert_relative_eq!(angle_diff(1.0, 1.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_diff_crossing_pi() {
        assert_relative_eq!(angle_diff(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-6);
        assert_relative_eq!(angle_diff(-PI + 0.1, PI - 0.1), -0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_lerp_endpoints_and_midpoint() {
        assert_relative_eq!(angle_lerp(0.0, PI / 2.0, 0.0), 0.0);
        assert_relative_eq!(angle_lerp(0.0, PI / 2.0, 1.0), PI / 2.0);
        assert_relative_eq!(angle_lerp(0.0, PI / 2.0, 0.5), PI / 4.0);
    }

    #[test]
    fn test_angle_lerp_crossing_pi() {
        let result = angle_lerp(PI - 0.1, -PI + 0.1, 0.5);
        assert_relative_eq!(result, PI, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_handles_non_finite() {
        assert!(normalize_angle(f32::NAN).is_nan());
        assert!(normalize_angle(f32::INFINITY).is_nan());
    }
}
