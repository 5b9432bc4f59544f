//! Core data types shared across the crate.
//!
//! - [`Point2D`]: 2D point in meters
//! - [`LaserScan`]: planar range scan with frame and timestamp
//! - [`Header`]: sequence/stamp/frame metadata on emitted messages

mod header;
mod point;
mod scan;

pub use header::Header;
pub use point::Point2D;
pub use scan::LaserScan;
