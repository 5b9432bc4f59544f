//! Per-scan build cycle for the egocentric grid.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::types::{Header, LaserScan, Point2D};
use crate::encoder::plan::PlanHandle;
use crate::error::{DrishtiError, Result};
use crate::frames::TransformSource;
use crate::grid::{CostmapGeometry, EgoGrid, GridGeometry, GridSnapshot, cell};

/// Settings of the build cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridBuilderConfig {
    /// Frame the grid is centered on and expressed in.
    pub body_frame: String,

    /// Per-waypoint wait budget in milliseconds for time-matched
    /// transforms in the path pass. The obstacle pass never waits.
    pub path_wait_ms: u64,
}

impl Default for GridBuilderConfig {
    fn default() -> Self {
        Self {
            body_frame: "base_link".to_owned(),
            path_wait_ms: 200,
        }
    }
}

impl GridBuilderConfig {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: GridBuilderConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// The path pass wait budget as a [`Duration`].
    #[inline]
    pub fn path_wait(&self) -> Duration {
        Duration::from_millis(self.path_wait_ms)
    }
}

/// Counters from one build cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    /// Cells painted occupied by the obstacle pass
    pub obstacle_cells: usize,
    /// Range readings rejected by the validity test
    pub ranges_discarded: usize,
    /// Valid readings whose cell fell outside the grid
    pub obstacles_dropped: usize,
    /// Path cells written by the gradient
    pub path_cells: usize,
    /// Waypoints transformed fine but landing outside the grid
    pub waypoints_dropped: usize,
    /// Failed transform lookups (whole scan or single waypoint)
    pub transform_failures: usize,
    /// Wall-clock time of the cycle in microseconds
    pub cycle_us: u64,
}

/// Output of one build cycle.
#[derive(Debug, Clone)]
pub struct CycleResult {
    /// The finished grid
    pub snapshot: GridSnapshot,
    /// Cycle diagnostics
    pub stats: CycleStats,
}

/// Builds one egocentric grid per scan.
///
/// Owned by the single producer thread; the only shared inputs are the
/// transform source and the plan handle. The grid is allocated lazily
/// when the first scan arrives, using the geometry the costmap provider
/// reports at that moment, and reused afterwards.
///
/// A cycle runs reset, obstacle pass, path pass, snapshot, in that
/// order. The path pass runs last so a waypoint landing on an occupied
/// cell leaves the path value. Transform failures degrade the affected
/// pass and never abort the cycle; a snapshot is emitted every time,
/// even if every cell is still unknown.
pub struct GridBuilder {
    config: GridBuilderConfig,
    transforms: Arc<dyn TransformSource + Send + Sync>,
    geometry_source: Box<dyn CostmapGeometry + Send>,
    plan: PlanHandle,
    grid: Option<EgoGrid>,
    seq: u32,
}

impl GridBuilder {
    /// Create a builder. The geometry source is queried once, when the
    /// first scan arrives.
    pub fn new(
        config: GridBuilderConfig,
        transforms: Arc<dyn TransformSource + Send + Sync>,
        geometry_source: impl CostmapGeometry + Send + 'static,
        plan: PlanHandle,
    ) -> Self {
        Self {
            config,
            transforms,
            geometry_source: Box::new(geometry_source),
            plan,
            grid: None,
            seq: 0,
        }
    }

    /// The plan handle cycles read from.
    pub fn plan_handle(&self) -> PlanHandle {
        self.plan.clone()
    }

    /// The builder settings.
    pub fn config(&self) -> &GridBuilderConfig {
        &self.config
    }

    /// Grid geometry once allocated.
    ///
    /// Fails with [`DrishtiError::UninitializedGrid`] before the first
    /// scan has been processed.
    pub fn geometry(&self) -> Result<GridGeometry> {
        match &self.grid {
            Some(grid) => Ok(grid.geometry()),
            None => Err(DrishtiError::UninitializedGrid),
        }
    }

    /// Run one build cycle and return the finished grid with its
    /// diagnostics.
    pub fn process_scan(&mut self, scan: &LaserScan) -> CycleResult {
        let started = Instant::now();
        let mut stats = CycleStats::default();
        let cycle_stamp = scan.stamp_us;

        let mut grid = match self.grid.take() {
            Some(mut grid) => {
                grid.reset();
                grid
            }
            None => {
                let geometry = self.geometry_source.geometry();
                info!(
                    width = geometry.width,
                    height = geometry.height,
                    resolution = geometry.resolution,
                    "allocating egocentric grid"
                );
                // A fresh allocation is already all unknown.
                EgoGrid::new(geometry)
            }
        };

        self.obstacle_pass(&mut grid, scan, &mut stats);
        self.path_pass(&mut grid, cycle_stamp, &mut stats);

        let snapshot = GridSnapshot {
            header: Header::new(self.seq, cycle_stamp, self.config.body_frame.clone()),
            geometry: grid.geometry(),
            origin: grid.origin(),
            cells: grid.cells().to_vec(),
        };
        self.seq = self.seq.wrapping_add(1);
        self.grid = Some(grid);

        stats.cycle_us = started.elapsed().as_micros() as u64;
        debug!(
            seq = snapshot.header.seq,
            obstacle_cells = stats.obstacle_cells,
            path_cells = stats.path_cells,
            transform_failures = stats.transform_failures,
            cycle_us = stats.cycle_us,
            "cycle complete"
        );

        CycleResult { snapshot, stats }
    }

    /// Rasterize the scan's valid returns as occupied cells.
    ///
    /// One non-blocking lookup covers the whole scan; if it fails the
    /// pass is skipped and the grid stays unknown for this cycle.
    fn obstacle_pass(&self, grid: &mut EgoGrid, scan: &LaserScan, stats: &mut CycleStats) {
        let transform = match self
            .transforms
            .lookup_latest(&scan.frame_id, &self.config.body_frame)
        {
            Ok(t) => t,
            Err(err) => {
                stats.transform_failures += 1;
                warn!(error = %err, "obstacle pass skipped, grid stays unknown this cycle");
                return;
            }
        };

        for (i, &range) in scan.ranges.iter().enumerate() {
            if !scan.is_valid_range(range) {
                stats.ranges_discarded += 1;
                continue;
            }
            let angle = scan.angle_at(i);
            let sensor_point = Point2D::new(range * angle.cos(), range * angle.sin());
            if grid.paint(transform.apply(sensor_point), cell::OCCUPIED) {
                stats.obstacle_cells += 1;
            } else {
                stats.obstacles_dropped += 1;
            }
        }
    }

    /// Overlay the remaining path as a progress gradient.
    ///
    /// Works on a tear-free copy of the plan. Each waypoint gets a
    /// time-matched transform at the cycle stamp with a bounded wait;
    /// failures skip the waypoint. In-bounds cells are collected in
    /// path order first, then colored from 50 down to 0 so the value
    /// encodes progress over the cells that made it into view.
    fn path_pass(&self, grid: &mut EgoGrid, cycle_stamp: u64, stats: &mut CycleStats) {
        let plan = self.plan.snapshot();
        if plan.is_empty() {
            return;
        }

        let path_wait = self.config.path_wait();
        let mut path_cells: Vec<(u32, u32)> = Vec::with_capacity(plan.len());
        for waypoint in &plan.points {
            let transform = match self.transforms.lookup_at_time(
                &plan.frame_id,
                &self.config.body_frame,
                cycle_stamp,
                path_wait,
            ) {
                Ok(t) => t,
                Err(err) => {
                    stats.transform_failures += 1;
                    debug!(error = %err, "skipping waypoint");
                    continue;
                }
            };
            match grid.cell_index(transform.apply(*waypoint)) {
                Some(indices) => path_cells.push(indices),
                None => stats.waypoints_dropped += 1,
            }
        }

        let count = path_cells.len();
        for (k, &(col, row)) in path_cells.iter().enumerate() {
            grid.set_cell(col, row, cell::path_gradient_value(k, count));
        }
        stats.path_cells = count;
    }
}
