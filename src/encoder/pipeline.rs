//! Builder and temporal stack wired together.

use crate::core::types::LaserScan;
use crate::encoder::builder::{CycleResult, CycleStats, GridBuilder};
use crate::encoder::plan::PlanHandle;
use crate::encoder::stack::{StackedFrames, TemporalStack};
use crate::grid::GridSnapshot;

/// Everything one scan produced.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// The finished grid for this scan
    pub snapshot: GridSnapshot,
    /// The stacked block, on the scan that completed one
    pub stacked: Option<StackedFrames>,
    /// Cycle diagnostics
    pub stats: CycleStats,
}

/// Drives a [`GridBuilder`] and feeds every snapshot into a
/// [`TemporalStack`].
///
/// The stack is created after the first cycle, once the grid geometry
/// is known. One instance per producer thread.
pub struct PerceptionPipeline {
    builder: GridBuilder,
    stack: Option<TemporalStack>,
    depth: u32,
}

impl PerceptionPipeline {
    /// Wire a builder to a stack of the given depth.
    pub fn new(builder: GridBuilder, depth: u32) -> Self {
        Self {
            builder,
            stack: None,
            depth,
        }
    }

    /// The plan handle cycles read from.
    pub fn plan_handle(&self) -> PlanHandle {
        self.builder.plan_handle()
    }

    /// The underlying builder.
    pub fn builder(&self) -> &GridBuilder {
        &self.builder
    }

    /// Frames gathered per emitted block.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Run one cycle and stack its snapshot.
    pub fn handle_scan(&mut self, scan: &LaserScan) -> ScanOutput {
        let CycleResult { snapshot, stats } = self.builder.process_scan(scan);

        if self.stack.is_none() {
            self.stack = Some(TemporalStack::new(snapshot.geometry, self.depth));
        }
        let stacked = self
            .stack
            .as_mut()
            .and_then(|stack| stack.push(&snapshot));

        ScanOutput {
            snapshot,
            stacked,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::builder::GridBuilderConfig;
    use crate::frames::{RigidTransform2D, TransformBuffer};
    use crate::grid::GridGeometry;
    use std::sync::Arc;

    fn pipeline(depth: u32) -> (PerceptionPipeline, Arc<TransformBuffer>) {
        let transforms = Arc::new(TransformBuffer::new());
        let config = GridBuilderConfig {
            body_frame: "base_link".to_owned(),
            path_wait_ms: 0,
        };
        let builder = GridBuilder::new(
            config,
            transforms.clone(),
            GridGeometry::new(8, 8, 0.5),
            PlanHandle::new(),
        );
        (PerceptionPipeline::new(builder, depth), transforms)
    }

    fn scan(stamp_us: u64) -> LaserScan {
        LaserScan::new(0.0, 0.1, 0.05, 8.0, vec![1.0], "laser", stamp_us)
    }

    #[test]
    fn test_stacks_every_depth_scans() {
        let (mut pipeline, transforms) = pipeline(2);
        transforms.insert("laser", "base_link", RigidTransform2D::identity(), 0);

        let first = pipeline.handle_scan(&scan(100));
        assert!(first.stacked.is_none());
        assert_eq!(first.snapshot.header.seq, 0);

        let second = pipeline.handle_scan(&scan(200));
        let block = second.stacked.unwrap();
        assert_eq!(block.header.seq, 0);
        assert_eq!(block.header.stamp_us, 200);
        assert_eq!(block.values.len(), 8 * 8 * 2);

        let third = pipeline.handle_scan(&scan(300));
        assert!(third.stacked.is_none());
    }

    #[test]
    fn test_geometry_known_after_first_scan() {
        let (mut pipeline, _transforms) = pipeline(4);
        assert!(pipeline.builder().geometry().is_err());
        pipeline.handle_scan(&scan(100));
        assert!(pipeline.builder().geometry().is_ok());
    }
}
