//! Error types for drishti-grid.

use thiserror::Error;

use crate::frames::TransformError;

/// Errors surfaced by the library.
///
/// Transform failures inside a build cycle are handled per point and
/// never escape as errors; what does escape is configuration and
/// lifecycle misuse.
#[derive(Error, Debug)]
pub enum DrishtiError {
    /// IO failure, typically while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration
    #[error("Config error: {0}")]
    Config(String),

    /// A transform lookup failed outside the cycle's skip handling
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// An operation needed the grid before the first scan allocated it
    #[error("grid not initialized: no scan processed yet")]
    UninitializedGrid,
}

impl From<toml::de::Error> for DrishtiError {
    fn from(err: toml::de::Error) -> Self {
        DrishtiError::Config(err.to_string())
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, DrishtiError>;
