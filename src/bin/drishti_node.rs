//! drishti-node daemon
//!
//! Runs the perception pipeline against a simulated robot: a body
//! orbiting inside a square room, a lidar raycast against the walls,
//! and a straight-line plan refreshed ahead of the robot. Emitted
//! snapshots and stacked blocks are logged; wire them to a transport to
//! feed a real consumer.
//!
//! # Usage
//!
//! ```bash
//! # With default config
//! cargo run --bin drishti_node
//!
//! # With custom config file
//! cargo run --bin drishti_node -- --config drishti-grid.toml
//!
//! # Stop after 40 scans
//! cargo run --bin drishti_node -- --scans 40
//! ```

use std::f32::consts::{FRAC_PI_2, PI};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use drishti_grid::core::math::normalize_angle;
use drishti_grid::encoder::{
    GridBuilder, GridBuilderConfig, PathPlan, PerceptionPipeline, PlanHandle,
};
use drishti_grid::frames::{RigidTransform2D, TransformBuffer};
use drishti_grid::grid::GridGeometry;
use drishti_grid::{LaserScan, Point2D, cell};

/// Configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
struct Config {
    #[serde(default)]
    frames: FramesConfig,
    #[serde(default)]
    grid: GridConfig,
    #[serde(default)]
    stack: StackConfig,
    #[serde(default)]
    transforms: TransformsConfig,
    #[serde(default)]
    sim: SimConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FramesConfig {
    body: String,
    laser: String,
    map: String,
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            body: "base_link".to_string(),
            laser: "laser".to_string(),
            map: "map".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct GridConfig {
    width: u32,
    height: u32,
    resolution: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 80,
            resolution: 0.05, // 5cm cells, 4m x 4m window
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct StackConfig {
    depth: u32,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            depth: drishti_grid::DEFAULT_STACK_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct TransformsConfig {
    path_wait_ms: u64,
}

impl Default for TransformsConfig {
    fn default() -> Self {
        Self { path_wait_ms: 200 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct SimConfig {
    scan_rate_hz: f32,
    rays: usize,
    range_min: f32,
    range_max: f32,
    room_half_extent: f32,
    orbit_radius: f32,
    angular_speed: f32,
    range_noise: f32,
    plan_refresh_ticks: u64,
    plan_step: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scan_rate_hz: 10.0,
            rays: 360,
            range_min: 0.05,
            range_max: 8.0,
            room_half_extent: 2.5, // 5m x 5m room
            orbit_radius: 1.2,
            angular_speed: 0.4, // rad/s along the orbit
            range_noise: 0.01,
            plan_refresh_ticks: 10,
            plan_step: 0.2,
        }
    }
}

/// Command line arguments
struct Args {
    config_path: Option<String>,
    max_scans: Option<u64>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args {
        config_path: None,
        max_scans: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    result.config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--scans" | "-n" => {
                if i + 1 < args.len() {
                    result.max_scans = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    result
}

fn print_help() {
    println!("drishti-node - egocentric perception grid daemon");
    println!();
    println!("USAGE:");
    println!("    drishti_node [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (drishti-grid.toml)");
    println!("    -n, --scans <COUNT>     Stop after this many scans");
    println!("    -h, --help              Print help information");
}

fn load_config(args: &Args) -> Config {
    match &args.config_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(cfg) => {
                    eprintln!("Loaded config from {}", path);
                    cfg
                }
                Err(e) => {
                    eprintln!("Failed to parse config {}: {}", path, e);
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Failed to read config {}: {}", path, e);
                Config::default()
            }
        },
        None => {
            // Try default paths
            for path in &["drishti-grid.toml", "/etc/drishti-grid.toml"] {
                if let Ok(contents) = fs::read_to_string(path)
                    && let Ok(cfg) = toml::from_str(&contents)
                {
                    eprintln!("Loaded config from {}", path);
                    return cfg;
                }
            }
            Config::default()
        }
    }
}

/// Distance from `(px, py)` along the unit direction `(dx, dy)` to the
/// walls of the square `[-half, half]^2`. The caller is inside the
/// room, so a wall is always hit.
fn ray_to_wall(px: f32, py: f32, dx: f32, dy: f32, half: f32) -> f32 {
    let mut t_min = f32::INFINITY;
    if dx.abs() > 1e-6 {
        for wall_x in [-half, half] {
            let t = (wall_x - px) / dx;
            if t > 0.0 {
                let y = py + t * dy;
                if y.abs() <= half && t < t_min {
                    t_min = t;
                }
            }
        }
    }
    if dy.abs() > 1e-6 {
        for wall_y in [-half, half] {
            let t = (wall_y - py) / dy;
            if t > 0.0 {
                let x = px + t * dx;
                if x.abs() <= half && t < t_min {
                    t_min = t;
                }
            }
        }
    }
    t_min
}

/// Waypoints from `start` to `goal` at roughly `step` spacing,
/// including both endpoints.
fn line_points(start: Point2D, goal: Point2D, step: f32) -> Vec<Point2D> {
    let dist = start.distance(&goal);
    if dist < 1e-6 || step <= 0.0 {
        return vec![goal];
    }
    let segments = (dist / step).ceil() as usize;
    (0..=segments)
        .map(|k| {
            let s = k as f32 / segments as f32;
            Point2D::new(start.x + s * (goal.x - start.x), start.y + s * (goal.y - start.y))
        })
        .collect()
}

/// Feeder thread: walks the body along its orbit, publishing the
/// map-to-body transform, a refreshed plan and a raycast scan per tick.
fn run_simulation(
    config: Config,
    transforms: Arc<TransformBuffer>,
    plan: PlanHandle,
    scan_tx: crossbeam_channel::Sender<LaserScan>,
    running: Arc<AtomicBool>,
) {
    let sim = &config.sim;
    let mut rng = StdRng::seed_from_u64(42);
    let dt = 1.0 / sim.scan_rate_hz;
    let angle_increment = 2.0 * PI / sim.rays as f32;
    // Lidar mount: 8cm ahead of the body origin, facing forward.
    let mount_offset = 0.08_f32;
    let mut tick: u64 = 0;

    while running.load(Ordering::Relaxed) {
        let t = tick as f32 * dt;
        let stamp_us = (t * 1e6) as u64;

        // Body pose on the orbit, heading along the tangent.
        let phase = sim.angular_speed * t;
        let body_x = sim.orbit_radius * phase.cos();
        let body_y = sim.orbit_radius * phase.sin();
        let heading = normalize_angle(phase + FRAC_PI_2);
        transforms.insert(
            &config.frames.map,
            &config.frames.body,
            RigidTransform2D::into_frame(body_x, body_y, heading),
            stamp_us,
        );

        if tick % sim.plan_refresh_ticks == 0 {
            let goal_phase = phase + FRAC_PI_2;
            let goal = Point2D::new(
                sim.orbit_radius * goal_phase.cos(),
                sim.orbit_radius * goal_phase.sin(),
            );
            let waypoints = line_points(Point2D::new(body_x, body_y), goal, sim.plan_step);
            debug!(waypoints = waypoints.len(), "plan refreshed");
            plan.replace(PathPlan::new(config.frames.map.clone(), waypoints));
        }

        // Raycast the room walls from the lidar's world position.
        let laser_x = body_x + mount_offset * heading.cos();
        let laser_y = body_y + mount_offset * heading.sin();
        let mut ranges = Vec::with_capacity(sim.rays);
        for i in 0..sim.rays {
            let bearing = -PI + i as f32 * angle_increment;
            let direction = heading + bearing;
            let hit = ray_to_wall(
                laser_x,
                laser_y,
                direction.cos(),
                direction.sin(),
                sim.room_half_extent,
            );
            let noisy = hit + rng.gen_range(-sim.range_noise..=sim.range_noise);
            ranges.push(noisy);
        }

        let scan = LaserScan::new(
            -PI,
            angle_increment,
            sim.range_min,
            sim.range_max,
            ranges,
            config.frames.laser.clone(),
            stamp_us,
        );
        if scan_tx.send(scan).is_err() {
            break;
        }

        tick = tick.wrapping_add(1);
        thread::sleep(Duration::from_secs_f32(dt));
    }
}

fn run_pipeline(
    config: &Config,
    mut pipeline: PerceptionPipeline,
    scan_rx: Receiver<LaserScan>,
    running: Arc<AtomicBool>,
    max_scans: Option<u64>,
) {
    let mut scan_count: u64 = 0;
    let mut block_count: u64 = 0;
    let mut last_log = Instant::now();

    while running.load(Ordering::Relaxed) {
        let scan = match scan_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(scan) => scan,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("scan feed disconnected");
                break;
            }
        };

        let output = pipeline.handle_scan(&scan);
        scan_count += 1;
        debug!(
            seq = output.snapshot.header.seq,
            obstacle_cells = output.stats.obstacle_cells,
            path_cells = output.stats.path_cells,
            cycle_us = output.stats.cycle_us,
            "snapshot"
        );

        if let Some(block) = output.stacked {
            block_count += 1;
            info!(
                seq = block.header.seq,
                stamp_us = block.header.stamp_us,
                depth = block.depth,
                occupied = output.snapshot.count_value(cell::OCCUPIED),
                path = output.stats.path_cells,
                "stacked block complete"
            );
        }

        if last_log.elapsed() >= Duration::from_secs(10) {
            info!(
                scans = scan_count,
                blocks = block_count,
                body_frame = %config.frames.body,
                "pipeline running"
            );
            last_log = Instant::now();
        }

        if let Some(limit) = max_scans
            && scan_count >= limit
        {
            info!(scans = scan_count, "scan limit reached");
            running.store(false, Ordering::Relaxed);
        }
    }

    info!(scans = scan_count, blocks = block_count, "pipeline stopped");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("drishti_grid=info".parse().unwrap())
                .add_directive("drishti_node=info".parse().unwrap()),
        )
        .init();

    let args = parse_args();
    let config = load_config(&args);

    info!("drishti-node starting...");
    info!(
        width = config.grid.width,
        height = config.grid.height,
        resolution = config.grid.resolution,
        depth = config.stack.depth,
        "grid window"
    );
    info!(
        rate_hz = config.sim.scan_rate_hz,
        rays = config.sim.rays,
        room = config.sim.room_half_extent * 2.0,
        "simulated feed"
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");

    let transforms = Arc::new(TransformBuffer::new());
    // The lidar mount never moves; one sample serves every lookup.
    transforms.insert(
        &config.frames.laser,
        &config.frames.body,
        RigidTransform2D::new(0.08, 0.0, 0.0),
        0,
    );

    let plan = PlanHandle::new();
    let builder = GridBuilder::new(
        GridBuilderConfig {
            body_frame: config.frames.body.clone(),
            path_wait_ms: config.transforms.path_wait_ms,
        },
        transforms.clone(),
        GridGeometry::new(config.grid.width, config.grid.height, config.grid.resolution),
        plan.clone(),
    );
    let pipeline = PerceptionPipeline::new(builder, config.stack.depth);

    let (scan_tx, scan_rx) = bounded::<LaserScan>(8);
    let sim_handle = {
        let config = config.clone();
        let transforms = transforms.clone();
        let running = running.clone();
        thread::Builder::new()
            .name("sim".to_string())
            .spawn(move || run_simulation(config, transforms, plan, scan_tx, running))
            .expect("Failed to spawn sim thread")
    };

    run_pipeline(&config, pipeline, scan_rx, running, args.max_scans);

    sim_handle.join().expect("sim thread panicked");
    info!("drishti-node shutdown complete");
}
