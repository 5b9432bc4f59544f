//! Cell value taxonomy of the egocentric grid.
//!
//! Cells carry one byte with three disjoint value bands, chosen so a
//! downstream consumer can tell them apart without side channels:
//!
//! - `70` — unknown / free-space fill written by the per-cycle reset
//! - `100` — occupied, written by the obstacle pass
//! - `50 ..= 0` — path progress gradient written by the path pass,
//!   50 at the nearest remaining waypoint and 0 at the final one

/// Value every cell is reset to at the start of a cycle.
pub const UNKNOWN: i8 = 70;

/// Value written where a valid range reading lands.
pub const OCCUPIED: i8 = 100;

/// Path gradient value at the nearest remaining waypoint.
pub const PATH_NEAR: i8 = 50;

/// Path gradient value at the final waypoint.
pub const PATH_GOAL: i8 = 0;

/// Coarse meaning of a cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    /// Never observed this cycle
    Unknown,
    /// Obstacle reported by the scan
    Occupied,
    /// On the remaining path
    Path,
}

/// Classify a cell value into its band, `None` for values no pass
/// writes.
#[inline]
pub fn classify(value: i8) -> Option<CellClass> {
    match value {
        UNKNOWN => Some(CellClass::Unknown),
        OCCUPIED => Some(CellClass::Occupied),
        PATH_GOAL..=PATH_NEAR => Some(CellClass::Path),
        _ => None,
    }
}

/// Gradient value of the `index`-th of `count` path cells.
///
/// Runs from [`PATH_NEAR`] at index 0 to [`PATH_GOAL`] at the last
/// index. A single-cell path gets [`PATH_NEAR`]; rounding is
/// half-away-from-zero.
#[inline]
pub fn path_gradient_value(index: usize, count: usize) -> i8 {
    if count <= 1 {
        return PATH_NEAR;
    }
    let step = (index as f32 / (count - 1) as f32) * PATH_NEAR as f32;
    PATH_NEAR - step.round() as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        assert_eq!(classify(UNKNOWN), Some(CellClass::Unknown));
        assert_eq!(classify(OCCUPIED), Some(CellClass::Occupied));
        assert_eq!(classify(50), Some(CellClass::Path));
        assert_eq!(classify(25), Some(CellClass::Path));
        assert_eq!(classify(0), Some(CellClass::Path));
        assert_eq!(classify(69), None);
        assert_eq!(classify(-1), None);
        assert_eq!(classify(101), None);
    }

    #[test]
    fn test_gradient_three_cells() {
        assert_eq!(path_gradient_value(0, 3), 50);
        assert_eq!(path_gradient_value(1, 3), 25);
        assert_eq!(path_gradient_value(2, 3), 0);
    }

    #[test]
    fn test_gradient_two_cells() {
        assert_eq!(path_gradient_value(0, 2), 50);
        assert_eq!(path_gradient_value(1, 2), 0);
    }

    #[test]
    fn test_gradient_single_cell_is_near_value() {
        assert_eq!(path_gradient_value(0, 1), 50);
    }

    #[test]
    fn test_gradient_endpoints_and_monotonicity() {
        let count = 51;
        let values: Vec<i8> = (0..count).map(|k| path_gradient_value(k, count)).collect();
        assert_eq!(values[0], PATH_NEAR);
        assert_eq!(values[count - 1], PATH_GOAL);
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!(values.iter().all(|&v| (PATH_GOAL..=PATH_NEAR).contains(&v)));
    }
}
