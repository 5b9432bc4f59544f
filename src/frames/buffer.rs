//! Buffered transform lookups between named frames.
//!
//! [`TransformBuffer`] keeps a short timestamp-ordered history per
//! (source, dest) frame pair and answers two kinds of queries: the most
//! recent transform (never blocks) and a time-matched transform
//! (interpolated, waiting a bounded time for late samples). Feeder
//! threads insert samples; the build cycle looks them up.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::debug;

use crate::frames::transform::{RigidTransform2D, StampedTransform};

/// Default per-pair history length. A few seconds of samples at typical
/// robot pose rates.
pub const DEFAULT_HISTORY: usize = 512;

/// Failure modes of a transform lookup.
///
/// Both are recoverable at the call site: the affected points are
/// skipped and the build cycle carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// No transform is recorded for the pair, or the requested time
    /// precedes the recorded history (waiting cannot help).
    #[error("no transform available from '{source_frame}' to '{dest}'")]
    Unavailable {
        /// Requested source frame
        source_frame: String,
        /// Requested destination frame
        dest: String,
    },

    /// No sample bracketing the requested time arrived within the wait
    /// budget.
    #[error(
        "timed out after {waited_ms} ms waiting for transform from '{source_frame}' to '{dest}' at {stamp_us} us"
    )]
    Timeout {
        /// Requested source frame
        source_frame: String,
        /// Requested destination frame
        dest: String,
        /// Requested time in microseconds
        stamp_us: u64,
        /// Wait budget that expired, in milliseconds
        waited_ms: u64,
    },
}

/// Supplier of frame-to-frame transforms.
///
/// The build cycle is written against this trait; [`TransformBuffer`] is
/// the in-process implementation.
pub trait TransformSource {
    /// Most recent transform from `source` to `dest`. Never blocks.
    fn lookup_latest(&self, source: &str, dest: &str)
    -> Result<RigidTransform2D, TransformError>;

    /// Transform from `source` to `dest` at `stamp_us`, interpolated
    /// between the bracketing samples. Waits up to `max_wait` for a
    /// sample at or past the requested time.
    fn lookup_at_time(
        &self,
        source: &str,
        dest: &str,
        stamp_us: u64,
        max_wait: Duration,
    ) -> Result<RigidTransform2D, TransformError>;
}

/// Outcome of probing one pair's history for a time-matched sample.
enum Probe {
    /// Bracketing samples found, transform interpolated
    Ready(RigidTransform2D),
    /// History starts after the requested time; waiting cannot help
    BeforeHistory,
    /// No sample at or past the requested time yet
    Pending,
}

/// Timestamp-ordered transform history per (source, dest) frame pair.
///
/// Shared between feeder threads and the build cycle behind an `Arc`.
/// Inserting a sample with a timestamp older than the newest recorded
/// one clears that pair's history (clock restart).
pub struct TransformBuffer {
    pairs: Mutex<HashMap<(String, String), VecDeque<StampedTransform>>>,
    data_arrived: Condvar,
    capacity: usize,
}

impl TransformBuffer {
    /// Create a buffer with the default per-pair history length.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }

    /// Create a buffer keeping at most `capacity` samples per pair.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Mutex::new(HashMap::new()),
            data_arrived: Condvar::new(),
            capacity,
        }
    }

    /// Record a transform sample for the (source, dest) pair and wake
    /// any bounded waiters.
    pub fn insert(&self, source: &str, dest: &str, transform: RigidTransform2D, stamp_us: u64) {
        let mut pairs = self.pairs.lock();
        let history = pairs
            .entry((source.to_owned(), dest.to_owned()))
            .or_default();

        if let Some(newest) = history.back()
            && stamp_us < newest.stamp_us
        {
            debug!(
                source,
                dest,
                newest_us = newest.stamp_us,
                inserted_us = stamp_us,
                "transform timestamp went backwards, clearing pair history"
            );
            history.clear();
        }

        history.push_back(StampedTransform::new(transform, stamp_us));
        while history.len() > self.capacity {
            history.pop_front();
        }
        drop(pairs);
        self.data_arrived.notify_all();
    }

    /// Number of samples currently held for a pair.
    pub fn history_len(&self, source: &str, dest: &str) -> usize {
        self.pairs
            .lock()
            .get(&(source.to_owned(), dest.to_owned()))
            .map_or(0, VecDeque::len)
    }

    fn probe(history: Option<&VecDeque<StampedTransform>>, stamp_us: u64) -> Probe {
        let Some(history) = history else {
            return Probe::Pending;
        };
        let Some(front) = history.front() else {
            return Probe::Pending;
        };
        if stamp_us < front.stamp_us {
            return Probe::BeforeHistory;
        }

        let mut prev: Option<&StampedTransform> = None;
        for sample in history {
            if sample.stamp_us >= stamp_us {
                return match prev {
                    // front.stamp_us <= stamp_us, so this is an exact hit
                    None => Probe::Ready(sample.transform),
                    Some(earlier) => {
                        match RigidTransform2D::interpolate(earlier, sample, stamp_us) {
                            Some(t) => Probe::Ready(t),
                            None => Probe::Pending,
                        }
                    }
                };
            }
            prev = Some(sample);
        }
        Probe::Pending
    }
}

impl Default for TransformBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformSource for TransformBuffer {
    fn lookup_latest(
        &self,
        source: &str,
        dest: &str,
    ) -> Result<RigidTransform2D, TransformError> {
        self.pairs
            .lock()
            .get(&(source.to_owned(), dest.to_owned()))
            .and_then(VecDeque::back)
            .map(|sample| sample.transform)
            .ok_or_else(|| TransformError::Unavailable {
                source_frame: source.to_owned(),
                dest: dest.to_owned(),
            })
    }

    fn lookup_at_time(
        &self,
        source: &str,
        dest: &str,
        stamp_us: u64,
        max_wait: Duration,
    ) -> Result<RigidTransform2D, TransformError> {
        let deadline = Instant::now() + max_wait;
        let key = (source.to_owned(), dest.to_owned());

        let mut pairs = self.pairs.lock();
        loop {
            match Self::probe(pairs.get(&key), stamp_us) {
                Probe::Ready(transform) => return Ok(transform),
                Probe::BeforeHistory => {
                    return Err(TransformError::Unavailable {
                        source_frame: source.to_owned(),
                        dest: dest.to_owned(),
                    });
                }
                Probe::Pending => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(TransformError::Timeout {
                            source_frame: source.to_owned(),
                            dest: dest.to_owned(),
                            stamp_us,
                            waited_ms: max_wait.as_millis() as u64,
                        });
                    }
                    self.data_arrived.wait_for(&mut pairs, deadline - now);
                }
            }
        }
    }
}
