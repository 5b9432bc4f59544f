//! Metadata header carried by every emitted message.

use serde::{Deserialize, Serialize};

/// Sequence number, timestamp and reference frame of an emitted message.
///
/// `seq` counts per stream starting at 0; the snapshot stream and the
/// stacked stream each keep their own counter. `stamp_us` is the scan
/// timestamp of the cycle that produced (or completed) the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Monotonically increasing per-stream counter, first message is 0
    pub seq: u32,
    /// Timestamp in microseconds
    pub stamp_us: u64,
    /// Frame the payload is expressed in
    pub frame_id: String,
}

impl Header {
    /// Create a header.
    pub fn new(seq: u32, stamp_us: u64, frame_id: impl Into<String>) -> Self {
        Self {
            seq,
            stamp_us,
            frame_id: frame_id.into(),
        }
    }
}
