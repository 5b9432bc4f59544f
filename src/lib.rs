//! DrishtiGrid - Egocentric perception grids for local navigation
//!
//! Turns raw planar range scans plus an externally supplied path into a
//! compact, fixed-size occupancy representation centered on the robot,
//! ready to feed a learned or reactive local controller. Every scan
//! triggers one build cycle; every `depth` cycles complete one stacked
//! block.
//!
//! # Architecture
//!
//! ```text
//!            sensor feed (LaserScan)
//!                     │
//!                     ▼
//!   plan provider ─► GridBuilder ◄─ transform service
//!   (PlanHandle)      │    uses       (TransformSource)
//!                     │  RigidTransform2D + EgoGrid
//!                     ▼
//!               GridSnapshot ──────────► snapshot stream
//!                     │
//!                     ▼
//!               TemporalStack
//!                     │  every `depth` frames
//!                     ▼
//!               StackedFrames ─────────► stacked stream
//! ```
//!
//! # Build cycle
//!
//! 1. Reset every cell to unknown (70) and re-center on the body frame.
//! 2. Obstacle pass: one non-blocking transform lookup for the whole
//!    scan; valid returns are rasterized as occupied (100).
//! 3. Path pass: a tear-free copy of the plan, each waypoint
//!    time-matched to the scan stamp; surviving cells get the 50 → 0
//!    progress gradient.
//! 4. Snapshot with a counting header, pushed into the temporal stack.
//!
//! Transform failures degrade the affected pass and never abort a
//! cycle; an all-unknown grid is a valid output.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use drishti_grid::encoder::{GridBuilder, GridBuilderConfig, PerceptionPipeline, PlanHandle};
//! use drishti_grid::frames::{RigidTransform2D, TransformBuffer};
//! use drishti_grid::grid::GridGeometry;
//! use drishti_grid::core::types::LaserScan;
//!
//! let transforms = Arc::new(TransformBuffer::new());
//! transforms.insert("laser", "base_link", RigidTransform2D::identity(), 0);
//!
//! let config = GridBuilderConfig {
//!     body_frame: "base_link".to_owned(),
//!     path_wait_ms: 0,
//! };
//! let builder = GridBuilder::new(
//!     config,
//!     transforms,
//!     GridGeometry::new(80, 80, 0.05),
//!     PlanHandle::new(),
//! );
//! let mut pipeline = PerceptionPipeline::new(builder, 4);
//!
//! let scan = LaserScan::new(0.0, 0.01, 0.05, 8.0, vec![1.5; 360], "laser", 1_000);
//! let output = pipeline.handle_scan(&scan);
//! assert_eq!(output.snapshot.header.seq, 0);
//! assert!(output.stacked.is_none());
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Frames (depends on core)
// ============================================================================
pub mod frames;

// ============================================================================
// Layer 3: Grid (depends on core)
// ============================================================================
pub mod grid;

// ============================================================================
// Layer 4: Encoder (depends on core, frames, grid)
// ============================================================================
pub mod encoder;

// ============================================================================
// Errors
// ============================================================================
pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use self::core::math;
pub use self::core::types::{Header, LaserScan, Point2D};

// Frames
pub use frames::{
    RigidTransform2D, StampedTransform, TransformBuffer, TransformError, TransformSource,
};

// Grid
pub use grid::{CellClass, CostmapGeometry, EgoGrid, GridGeometry, GridSnapshot, cell};

// Encoder
pub use encoder::{
    CycleResult, CycleStats, DEFAULT_STACK_DEPTH, GridBuilder, GridBuilderConfig, PathPlan,
    PerceptionPipeline, PlanHandle, ScanOutput, StackedFrames, TemporalStack,
};

// Errors
pub use error::{DrishtiError, Result};
