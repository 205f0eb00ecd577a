//! # Engine Error Types
//!
//! All errors that can occur while building or running a simulation.

use thiserror::Error;

/// Errors that can occur in the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Board constructed with a zero dimension.
    #[error("invalid board dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions {
        /// Requested column count.
        width: usize,
        /// Requested row count.
        height: usize,
    },

    /// Cell coordinate outside the board.
    #[error("cell ({row}, {col}) is outside a {height}x{width} board")]
    CellOutOfBounds {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// Board row count.
        height: usize,
        /// Board column count.
        width: usize,
    },

    /// Worker count is zero or exceeds the number of rows.
    #[error("invalid worker count {workers}: must be between 1 and {rows} (the row count)")]
    InvalidWorkerCount {
        /// Requested worker count.
        workers: usize,
        /// Rows available for partitioning.
        rows: usize,
    },

    /// Phase barrier sized for zero participants.
    #[error("phase barrier needs at least one participant")]
    InvalidParticipants,

    /// Provided cell buffer does not match the board dimensions.
    #[error("cell buffer holds {actual} cells, expected {expected}")]
    CellCountMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the provided buffer.
        actual: usize,
    },

    /// A participant left the barrier abnormally; the run cannot continue.
    #[error("phase barrier broken: a worker aborted mid-run")]
    BarrierBroken,

    /// A worker thread panicked.
    #[error("worker {worker_id} panicked")]
    WorkerPanicked {
        /// Id of the worker that panicked.
        worker_id: usize,
    },

    /// The operating system refused to spawn a worker thread.
    #[error("failed to spawn worker {worker_id}: {reason}")]
    SpawnFailed {
        /// Id of the worker that could not be spawned.
        worker_id: usize,
        /// OS error text.
        reason: String,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
