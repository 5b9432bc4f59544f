//! Scan-to-grid encoding layer.
//!
//! - [`plan`]: the externally supplied path and its shared handle
//! - [`builder`]: the per-scan build cycle
//! - [`stack`]: temporal stacking of finished snapshots
//! - [`pipeline`]: builder and stack wired together

pub mod builder;
pub mod pipeline;
pub mod plan;
pub mod stack;

pub use builder::{CycleResult, CycleStats, GridBuilder, GridBuilderConfig};
pub use pipeline::{PerceptionPipeline, ScanOutput};
pub use plan::{PathPlan, PlanHandle};
pub use stack::{DEFAULT_STACK_DEPTH, StackedFrames, TemporalStack};
