//! # Row Partitioning
//!
//! Splits the board's rows into one contiguous range per worker.
//!
//! ```text
//! height = 10, workers = 4  →  remainder = 2
//!
//!   worker 0: rows 0..3   (3 rows)  ← gets one remainder row
//!   worker 1: rows 3..6   (3 rows)  ← gets one remainder row
//!   worker 2: rows 6..8   (2 rows)
//!   worker 3: rows 8..10  (2 rows)
//! ```

use std::ops::Range;

use crate::error::{EngineError, EngineResult};

/// Half-open range of board rows `[start, end)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowRange {
    start: usize,
    end: usize,
}

impl RowRange {
    /// Creates a range. `start` must not exceed `end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "row range start past end");
        Self { start, end }
    }

    /// First row of the range.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// One past the last row of the range.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Last row of the range (inclusive). Meaningless for an empty range.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> usize {
        self.end.saturating_sub(1)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the range holds no rows.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `row` lies inside the range.
    #[inline]
    #[must_use]
    pub const fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end
    }

    /// Iterates the rows of the range.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Assignment of every board row to exactly one worker.
///
/// Invariants (checked at construction):
/// - ranges are contiguous and in order, starting at row 0
/// - their union is exactly `[0, height)`
/// - every range has at least one row
/// - sizes differ by at most one, larger ranges first
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    height: usize,
    ranges: Vec<RowRange>,
}

impl Partition {
    /// Partitions `height` rows among `workers` workers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWorkerCount`] if `workers` is zero or
    /// greater than `height`.
    pub fn new(height: usize, workers: usize) -> EngineResult<Self> {
        if workers == 0 || workers > height {
            return Err(EngineError::InvalidWorkerCount {
                workers,
                rows: height,
            });
        }

        let base = height / workers;
        let mut remainder = height % workers;
        let mut ranges = Vec::with_capacity(workers);
        let mut start = 0;

        for _ in 0..workers {
            let mut rows = base;
            if remainder > 0 {
                rows += 1;
                remainder -= 1;
            }
            ranges.push(RowRange::new(start, start + rows));
            start += rows;
        }

        debug_assert_eq!(start, height);
        Ok(Self { height, ranges })
    }

    /// Total rows covered.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of ranges (one per worker).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Always false for a successfully constructed partition.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The ranges, indexed by worker id.
    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }

    /// Range owned by `worker_id`.
    #[inline]
    #[must_use]
    pub fn get(&self, worker_id: usize) -> Option<RowRange> {
        self.ranges.get(worker_id).copied()
    }

    /// Iterates the ranges in worker order.
    pub fn iter(&self) -> impl Iterator<Item = RowRange> + '_ {
        self.ranges.iter().copied()
    }
}
