//! Frame transforms and their buffered lookup.
//!
//! - [`transform`]: rigid 2D transforms between named frames
//! - [`buffer`]: per-pair transform history with latest and time-matched
//!   queries

pub mod buffer;
pub mod transform;

pub use buffer::{TransformBuffer, TransformError, TransformSource};
pub use transform::{RigidTransform2D, StampedTransform};
