//! # Frame Observation
//!
//! The render seam. During the Render phase of each generation the elected
//! worker copies the board and hands it to a [`FrameObserver`]. The board
//! is quiescent at that point: every worker is parked between
//! `PreRenderSync` and `PostRenderSync`.

use parking_lot::Mutex;

use crate::board::Grid;

/// One rendered generation.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Generations completed before this frame (0 for the initial board).
    pub generation: usize,
    /// True for the render of the final iteration.
    pub is_last: bool,
    /// Board contents.
    pub grid: &'a Grid,
}

/// Receives frames from the elected worker.
///
/// Called from worker threads, one call at a time.
pub trait FrameObserver: Sync {
    /// Handles one frame.
    fn on_frame(&self, frame: Frame<'_>);
}

/// Observer that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Mutex<Vec<(usize, bool, Grid)>>,
}

impl FrameRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(generation, is_last, grid)` triples, in call order.
    #[must_use]
    pub fn into_frames(self) -> Vec<(usize, bool, Grid)> {
        self.frames.into_inner()
    }

    /// Number of frames recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FrameObserver for FrameRecorder {
    fn on_frame(&self, frame: Frame<'_>) {
        self.frames
            .lock()
            .push((frame.generation, frame.is_last, frame.grid.clone()));
    }
}
