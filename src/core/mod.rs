//! Core foundation layer.
//!
//! The bottom layer of the crate with no internal dependencies; every
//! other layer builds on it.
//!
//! # Contents
//!
//! - [`types`]: Core data types (points, scans, headers)
//! - [`math`]: Angular arithmetic

pub mod math;
pub mod types;
