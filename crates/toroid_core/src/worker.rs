//! # Worker Protocol
//!
//! Each worker runs the same six-phase cycle once per generation:
//!
//! ```text
//!  ┌─► PreRenderSync ──► Render* ──► PostRenderSync ──► Snapshot ──► SnapshotSync ──► ComputeAndWrite ─┐
//!  └───────────────────────────────────────── next generation ◄─────────────────────────────────────────┘
//!
//!  * elected worker only, only when rendering is enabled
//! ```
//!
//! - `PreRenderSync`: previous generation's writes are done everywhere.
//! - `PostRenderSync`: nobody writes while the frame is being copied.
//! - `SnapshotSync`: nobody writes until every snapshot is taken.
//!
//! Neighbor reads go to the worker's private [`Snapshot`]; writes go
//! through its [`RowWriter`] and only touch its own rows.

use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::barrier::{PhaseBarrier, PhaseRelease};
use crate::board::{BoardView, RowWriter};
use crate::error::EngineResult;
use crate::observer::{Frame, FrameObserver};
use crate::partition::RowRange;
use crate::rule::next_state;
use crate::snapshot::{Snapshot, SnapshotStrategy};

/// Phases of one generation, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Rendezvous before rendering.
    PreRenderSync,
    /// Frame copy by the elected worker.
    Render,
    /// Rendezvous after rendering.
    PostRenderSync,
    /// Private copy of the board.
    Snapshot,
    /// Rendezvous after every snapshot is taken.
    SnapshotSync,
    /// Successor computation and write-back of owned rows.
    ComputeAndWrite,
}

/// Emitted on the phase trace when a worker COMPLETES a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEvent {
    /// Worker that completed the phase.
    pub worker_id: usize,
    /// Generation index (0-based).
    pub iteration: usize,
    /// Phase completed.
    pub phase: Phase,
}

/// Per-thread configuration, fixed at spawn time.
#[derive(Clone, Debug)]
pub struct WorkerContext {
    /// Worker id, equal to its partition index.
    pub worker_id: usize,
    /// Rows this worker computes and writes.
    pub rows: RowRange,
    /// Generations to run.
    pub iterations: usize,
    /// Whether the elected worker renders frames.
    pub render: bool,
    /// Snapshot strategy.
    pub snapshot: SnapshotStrategy,
    /// Optional phase trace.
    pub trace: Option<Sender<PhaseEvent>>,
}

/// Counters collected by one worker over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Generations completed.
    pub generations: usize,
    /// Frames this worker rendered as the elected participant.
    pub frames_rendered: usize,
    /// Cell writes that flipped a state.
    pub cells_changed: u64,
    /// Time parked at the barrier.
    pub wait_time: Duration,
    /// Time spent taking snapshots and computing rows.
    pub compute_time: Duration,
}

/// Breaks the barrier if the worker unwinds, so its peers are released.
struct BreakOnUnwind<'a>(&'a PhaseBarrier);

impl Drop for BreakOnUnwind<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!("worker panicked, breaking phase barrier");
            self.0.break_barrier();
        }
    }
}

impl WorkerContext {
    fn emit(&self, iteration: usize, phase: Phase) {
        if let Some(trace) = &self.trace {
            // A dropped receiver only means nobody is listening.
            let _ = trace.send(PhaseEvent {
                worker_id: self.worker_id,
                iteration,
                phase,
            });
        }
    }

    fn sync(
        &self,
        barrier: &PhaseBarrier,
        iteration: usize,
        phase: Phase,
        stats: &mut WorkerStats,
    ) -> EngineResult<PhaseRelease> {
        let start = Instant::now();
        let release = barrier.arrive_and_wait()?;
        stats.wait_time += start.elapsed();
        self.emit(iteration, phase);
        Ok(release)
    }
}

/// Runs the worker protocol to completion.
///
/// # Errors
///
/// Returns [`EngineError::BarrierBroken`](crate::EngineError::BarrierBroken)
/// if a peer aborts mid-run.
pub fn run_worker(
    ctx: &WorkerContext,
    view: BoardView<'_>,
    mut writer: RowWriter<'_>,
    barrier: &PhaseBarrier,
    observer: Option<&dyn FrameObserver>,
) -> EngineResult<WorkerStats> {
    debug_assert_eq!(writer.rows(), ctx.rows);
    let _guard = BreakOnUnwind(barrier);

    let mut snapshot = Snapshot::new(ctx.snapshot, view.width(), view.height(), ctx.rows);
    let mut stats = WorkerStats::default();

    tracing::debug!(
        worker = ctx.worker_id,
        first_row = ctx.rows.start(),
        last_row = ctx.rows.last(),
        "worker started"
    );

    for iteration in 0..ctx.iterations {
        let release = ctx.sync(barrier, iteration, Phase::PreRenderSync, &mut stats)?;

        if ctx.render && release.is_elected() {
            if let Some(observer) = observer {
                let grid = view.to_grid();
                observer.on_frame(Frame {
                    generation: iteration,
                    is_last: iteration + 1 == ctx.iterations,
                    grid: &grid,
                });
                stats.frames_rendered += 1;
                ctx.emit(iteration, Phase::Render);
            }
        }

        ctx.sync(barrier, iteration, Phase::PostRenderSync, &mut stats)?;

        let start = Instant::now();
        snapshot.capture(view);
        stats.compute_time += start.elapsed();
        ctx.emit(iteration, Phase::Snapshot);

        ctx.sync(barrier, iteration, Phase::SnapshotSync, &mut stats)?;

        let start = Instant::now();
        stats.cells_changed += compute_rows(&snapshot, &mut writer);
        stats.compute_time += start.elapsed();
        stats.generations += 1;
        ctx.emit(iteration, Phase::ComputeAndWrite);
    }

    tracing::debug!(
        worker = ctx.worker_id,
        generations = stats.generations,
        cells_changed = stats.cells_changed,
        "worker finished"
    );
    Ok(stats)
}

/// Writes the successor of every owned cell. Returns the number of flips.
fn compute_rows(snapshot: &Snapshot, writer: &mut RowWriter<'_>) -> u64 {
    let width = snapshot.width();
    let mut changed = 0;
    for row in writer.rows().iter() {
        for col in 0..width {
            let next = next_state(snapshot.cell(row, col), snapshot.live_neighbors(row, col));
            if writer.set(row, col, next) {
                changed += 1;
            }
        }
    }
    changed
}
