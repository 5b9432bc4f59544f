//! Temporal stacking of finished grid snapshots.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::Header;
use crate::grid::{GridGeometry, GridSnapshot};

/// Default number of frames per emitted block.
pub const DEFAULT_STACK_DEPTH: u32 = 4;

/// A block of `depth` consecutive grid frames, flattened oldest-first.
///
/// The header carries the stack stream's own sequence counter; stamp and
/// frame id come from the snapshot that completed the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedFrames {
    /// Stack sequence, completing scan stamp, body frame
    pub header: Header,
    /// Cell columns per frame
    pub width: u32,
    /// Cell rows per frame
    pub height: u32,
    /// Number of frames in the block
    pub depth: u32,
    /// `width * height * depth` cell values, oldest frame first
    pub values: Vec<i8>,
}

impl StackedFrames {
    /// Row-major cells of frame `k` (0 = oldest), `None` past the depth.
    pub fn frame(&self, k: u32) -> Option<&[i8]> {
        if k >= self.depth {
            return None;
        }
        let frame_len = self.width as usize * self.height as usize;
        let start = k as usize * frame_len;
        self.values.get(start..start + frame_len)
    }
}

/// Accumulates snapshots and emits a [`StackedFrames`] block exactly
/// when `depth` frames have been gathered.
///
/// Each push appends the snapshot's cells first; the block is emitted on
/// the push that fills the buffer, and the buffer is cleared in the same
/// step. A partial block is never emitted and no frame is dropped or
/// duplicated.
#[derive(Debug)]
pub struct TemporalStack {
    width: u32,
    height: u32,
    depth: u32,
    values: Vec<i8>,
    seq: u32,
}

impl TemporalStack {
    /// Create a stack gathering `depth` frames of the given geometry.
    pub fn new(geometry: GridGeometry, depth: u32) -> Self {
        let capacity = geometry.cell_count() * depth as usize;
        Self {
            width: geometry.width,
            height: geometry.height,
            depth,
            values: Vec::with_capacity(capacity),
            seq: 0,
        }
    }

    /// Frames gathered per emitted block.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Cell values required for one block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Cell values gathered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no frames are gathered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append one snapshot; returns the finished block if this push
    /// completed it.
    pub fn push(&mut self, snapshot: &GridSnapshot) -> Option<StackedFrames> {
        debug_assert_eq!(snapshot.geometry.width, self.width);
        debug_assert_eq!(snapshot.geometry.height, self.height);

        let capacity = self.capacity();
        if capacity == 0 {
            return None;
        }

        self.values.extend_from_slice(&snapshot.cells);
        if self.values.len() < capacity {
            return None;
        }

        let values = std::mem::replace(&mut self.values, Vec::with_capacity(capacity));
        let header = Header::new(
            self.seq,
            snapshot.header.stamp_us,
            snapshot.header.frame_id.clone(),
        );
        self.seq = self.seq.wrapping_add(1);
        debug!(seq = header.seq, depth = self.depth, "temporal stack complete");

        Some(StackedFrames {
            header,
            width: self.width,
            height: self.height,
            depth: self.depth,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_geometry() -> GridGeometry {
        GridGeometry::new(2, 2, 1.0)
    }

    fn snap(seq: u32, stamp_us: u64, fill: i8) -> GridSnapshot {
        let geometry = tiny_geometry();
        GridSnapshot {
            header: Header::new(seq, stamp_us, "base_link"),
            geometry,
            origin: geometry.centered_origin(),
            cells: vec![fill; geometry.cell_count()],
        }
    }

    #[test]
    fn test_emits_exactly_on_filling_push() {
        let mut stack = TemporalStack::new(tiny_geometry(), 3);

        assert!(stack.push(&snap(0, 100, 1)).is_none());
        assert_eq!(stack.len(), 4);
        assert!(stack.push(&snap(1, 200, 2)).is_none());
        assert_eq!(stack.len(), 8);

        let block = stack.push(&snap(2, 300, 3)).unwrap();
        assert_eq!(block.values.len(), 12);
        assert_eq!(&block.values[0..4], &[1, 1, 1, 1]);
        assert_eq!(&block.values[4..8], &[2, 2, 2, 2]);
        assert_eq!(&block.values[8..12], &[3, 3, 3, 3]);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_block_metadata_tracks_completing_snapshot() {
        let mut stack = TemporalStack::new(tiny_geometry(), 2);

        stack.push(&snap(7, 100, 0));
        let first = stack.push(&snap(8, 200, 0)).unwrap();
        assert_eq!(first.header.seq, 0);
        assert_eq!(first.header.stamp_us, 200);
        assert_eq!(first.header.frame_id, "base_link");
        assert_eq!((first.width, first.height, first.depth), (2, 2, 2));

        stack.push(&snap(9, 300, 0));
        let second = stack.push(&snap(10, 400, 0)).unwrap();
        assert_eq!(second.header.seq, 1);
        assert_eq!(second.header.stamp_us, 400);
    }

    #[test]
    fn test_depth_one_emits_every_push() {
        let mut stack = TemporalStack::new(tiny_geometry(), 1);
        for stamp in [10u64, 20, 30] {
            let block = stack.push(&snap(0, stamp, 5)).unwrap();
            assert_eq!(block.header.stamp_us, stamp);
            assert_eq!(block.values, vec![5; 4]);
        }
    }

    #[test]
    fn test_zero_capacity_never_emits() {
        let geometry = GridGeometry::new(0, 0, 0.05);
        let mut stack = TemporalStack::new(geometry, 4);
        let empty = GridSnapshot {
            header: Header::new(0, 100, "base_link"),
            geometry,
            origin: geometry.centered_origin(),
            cells: Vec::new(),
        };
        for _ in 0..10 {
            assert!(stack.push(&empty).is_none());
        }
    }

    #[test]
    fn test_frame_accessor_slices_block() {
        let mut stack = TemporalStack::new(tiny_geometry(), 2);
        stack.push(&snap(0, 100, 1));
        let block = stack.push(&snap(1, 200, 2)).unwrap();

        assert_eq!(block.frame(0), Some(&[1i8, 1, 1, 1][..]));
        assert_eq!(block.frame(1), Some(&[2i8, 2, 2, 2][..]));
        assert_eq!(block.frame(2), None);
    }
}
