//! Externally supplied path and its shared handle.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

/// The remaining path toward the goal: ordered waypoints in one fixed
/// reference frame.
///
/// The path is produced elsewhere (a global planner); this crate only
/// reads it. Pruning already-passed waypoints is the producer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPlan {
    /// Frame the waypoints are expressed in
    pub frame_id: String,
    /// Ordered waypoints, first is the nearest remaining one
    pub points: Vec<Point2D>,
}

impl PathPlan {
    /// Create a plan from its waypoints.
    pub fn new(frame_id: impl Into<String>, points: Vec<Point2D>) -> Self {
        Self {
            frame_id: frame_id.into(),
            points,
        }
    }

    /// A plan with no waypoints.
    pub fn empty(frame_id: impl Into<String>) -> Self {
        Self::new(frame_id, Vec::new())
    }

    /// Number of waypoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the plan holds no waypoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Clone-able handle sharing the current plan between the producer
/// thread and the build cycle.
///
/// `replace` swaps the whole plan atomically; `snapshot` clones it, so
/// a cycle always works on a tear-free copy no matter when the producer
/// replaces it.
#[derive(Debug, Clone)]
pub struct PlanHandle {
    inner: Arc<RwLock<PathPlan>>,
}

impl PlanHandle {
    /// Create a handle holding an empty plan.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(PathPlan::empty(""))),
        }
    }

    /// Swap in a new plan.
    pub fn replace(&self, plan: PathPlan) {
        *self.inner.write() = plan;
    }

    /// Tear-free copy of the current plan.
    pub fn snapshot(&self) -> PathPlan {
        self.inner.read().clone()
    }
}

impl Default for PlanHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_handle_is_empty() {
        let handle = PlanHandle::new();
        assert!(handle.snapshot().is_empty());
    }

    #[test]
    fn test_replace_and_snapshot() {
        let handle = PlanHandle::new();
        handle.replace(PathPlan::new("map", vec![Point2D::new(1.0, 0.0)]));

        let snap = handle.snapshot();
        assert_eq!(snap.frame_id, "map");
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_replace() {
        let handle = PlanHandle::new();
        handle.replace(PathPlan::new("map", vec![Point2D::new(1.0, 0.0)]));
        let snap = handle.snapshot();

        handle.replace(PathPlan::empty("map"));
        assert_eq!(snap.len(), 1);
        assert!(handle.snapshot().is_empty());
    }

    #[test]
    fn test_replace_from_another_thread() {
        let handle = PlanHandle::new();
        let producer = handle.clone();
        thread::spawn(move || {
            producer.replace(PathPlan::new("map", vec![Point2D::new(0.5, 0.5); 3]));
        })
        .join()
        .unwrap();

        assert_eq!(handle.snapshot().len(), 3);
    }
}
