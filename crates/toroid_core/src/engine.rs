//! # Simulation Orchestrator
//!
//! Owns the board for its whole life. A run:
//!
//! 1. splits the board into a read view and one writer per partition range
//! 2. spawns one scoped OS thread per range, all sharing one [`PhaseBarrier`]
//! 3. joins every worker, then takes the board back
//!
//! Scoped threads borrow the board, so it cannot be dropped or touched
//! by the orchestrator until every worker has joined.
//!
//! ## Example
//!
//! ```rust
//! use toroid_core::{Board, Cell, EngineConfig, Simulation};
//!
//! let mut board = Board::new(5, 5)?;
//! for col in 1..=3 {
//!     board.set(1, col, Cell::Alive)?;
//! }
//! let mut sim = Simulation::new(board, EngineConfig::new(2, 2))?;
//! let report = sim.run(None)?;
//! assert_eq!(report.live_cells, 3);
//! # Ok::<(), toroid_core::EngineError>(())
//! ```

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::barrier::PhaseBarrier;
use crate::board::{Board, Grid};
use crate::error::{EngineError, EngineResult};
use crate::observer::FrameObserver;
use crate::partition::Partition;
use crate::snapshot::SnapshotStrategy;
use crate::worker::{run_worker, PhaseEvent, WorkerContext, WorkerStats};

/// Run parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Worker threads (and partitions).
    pub workers: usize,
    /// Generations to compute.
    pub iterations: usize,
    /// Render a frame before every generation.
    pub render: bool,
    /// Snapshot strategy.
    pub snapshot: SnapshotStrategy,
}

impl EngineConfig {
    /// Config with rendering off and the default snapshot strategy.
    #[must_use]
    pub const fn new(workers: usize, iterations: usize) -> Self {
        Self {
            workers,
            iterations,
            render: false,
            snapshot: SnapshotStrategy::Halo,
        }
    }

    /// Enables or disables rendering.
    #[must_use]
    pub const fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    /// Selects the snapshot strategy.
    #[must_use]
    pub const fn with_snapshot(mut self, snapshot: SnapshotStrategy) -> Self {
        self.snapshot = snapshot;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(4, 1)
    }
}

/// Row assignment and counters for one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    /// Worker id.
    pub worker_id: usize,
    /// First owned row.
    pub first_row: usize,
    /// Last owned row (inclusive).
    pub last_row: usize,
    /// Owned row count.
    pub row_count: usize,
    /// Counters collected during the run.
    pub stats: WorkerStats,
}

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Wall-clock time from first spawn to last join.
    pub elapsed: Duration,
    /// Generations computed.
    pub iterations: usize,
    /// Board columns.
    pub width: usize,
    /// Board rows.
    pub height: usize,
    /// Live cells after the last generation.
    pub live_cells: usize,
    /// One entry per worker, in id order.
    pub workers: Vec<WorkerReport>,
}

impl RunReport {
    /// Sum of state flips across all workers.
    #[must_use]
    pub fn cells_changed(&self) -> u64 {
        self.workers.iter().map(|w| w.stats.cells_changed).sum()
    }

    /// Longest time any worker spent parked at the barrier.
    #[must_use]
    pub fn max_wait_time(&self) -> Duration {
        self.workers
            .iter()
            .map(|w| w.stats.wait_time)
            .max()
            .unwrap_or_default()
    }

    /// Snapshot and compute time summed over all workers.
    #[must_use]
    pub fn total_compute_time(&self) -> Duration {
        self.workers.iter().map(|w| w.stats.compute_time).sum()
    }
}

/// The orchestrator: a board plus a validated partition.
#[derive(Debug)]
pub struct Simulation {
    board: Board,
    partition: Partition,
    config: EngineConfig,
}

impl Simulation {
    /// Validates the worker count against the board and builds the partition.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWorkerCount`] if `config.workers` is
    /// zero or exceeds the board's row count.
    pub fn new(board: Board, config: EngineConfig) -> EngineResult<Self> {
        let partition = Partition::new(board.height(), config.workers)?;
        Ok(Self {
            board,
            partition,
            config,
        })
    }

    /// The board (final state after a run).
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The row assignment.
    #[must_use]
    pub const fn partition(&self) -> &Partition {
        &self.partition
    }

    /// The run parameters.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Copy of the current board.
    #[must_use]
    pub fn grid(&self) -> Grid {
        self.board.to_grid()
    }

    /// Gives the board back.
    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Runs `config.iterations` generations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerPanicked`] if a worker (or the observer)
    /// panics, [`EngineError::BarrierBroken`] if the run was aborted, or
    /// [`EngineError::SpawnFailed`] if a thread could not be started.
    pub fn run(&mut self, observer: Option<&dyn FrameObserver>) -> EngineResult<RunReport> {
        self.execute(observer, None)
    }

    /// Like [`run`](Self::run), emitting a [`PhaseEvent`] on `trace` every
    /// time a worker completes a phase.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_traced(
        &mut self,
        observer: Option<&dyn FrameObserver>,
        trace: Sender<PhaseEvent>,
    ) -> EngineResult<RunReport> {
        self.execute(observer, Some(trace))
    }

    fn execute(
        &mut self,
        observer: Option<&dyn FrameObserver>,
        trace: Option<Sender<PhaseEvent>>,
    ) -> EngineResult<RunReport> {
        let barrier = PhaseBarrier::new(self.partition.len())?;
        let config = self.config;

        tracing::info!(
            width = self.board.width(),
            height = self.board.height(),
            workers = config.workers,
            iterations = config.iterations,
            snapshot = ?config.snapshot,
            "starting simulation"
        );

        let start = Instant::now();
        let (view, writers) = self.board.split(&self.partition);

        let outcomes: Vec<EngineResult<WorkerStats>> = thread::scope(|scope| {
            let barrier = &barrier;
            let mut handles = Vec::with_capacity(writers.len());

            for (worker_id, writer) in writers.into_iter().enumerate() {
                let ctx = WorkerContext {
                    worker_id,
                    rows: writer.rows(),
                    iterations: config.iterations,
                    render: config.render,
                    snapshot: config.snapshot,
                    trace: trace.clone(),
                };
                let spawned = thread::Builder::new()
                    .name(format!("toroid-worker-{worker_id}"))
                    .spawn_scoped(scope, move || run_worker(&ctx, view, writer, barrier, observer));

                match spawned {
                    Ok(handle) => handles.push(Ok(handle)),
                    Err(e) => {
                        // Already-running peers would wait forever for this one.
                        barrier.break_barrier();
                        handles.push(Err(EngineError::SpawnFailed {
                            worker_id,
                            reason: e.to_string(),
                        }));
                    }
                }
            }

            handles
                .into_iter()
                .enumerate()
                .map(|(worker_id, handle)| match handle {
                    Ok(handle) => handle
                        .join()
                        .unwrap_or(Err(EngineError::WorkerPanicked { worker_id })),
                    Err(e) => Err(e),
                })
                .collect()
        });

        let elapsed = start.elapsed();
        let stats = Self::collect(outcomes)?;

        let workers = self
            .partition
            .iter()
            .zip(stats)
            .enumerate()
            .map(|(worker_id, (rows, stats))| WorkerReport {
                worker_id,
                first_row: rows.start(),
                last_row: rows.last(),
                row_count: rows.len(),
                stats,
            })
            .collect();

        let report = RunReport {
            elapsed,
            iterations: config.iterations,
            width: self.board.width(),
            height: self.board.height(),
            live_cells: self.board.live_count(),
            workers,
        };

        tracing::info!(
            elapsed_us = micros(elapsed),
            live_cells = report.live_cells,
            cells_changed = report.cells_changed(),
            max_wait_us = micros(report.max_wait_time()),
            compute_us = micros(report.total_compute_time()),
            "simulation finished"
        );
        Ok(report)
    }

    /// Picks the root cause when workers fail: the first error that is not
    /// a peer reacting to a broken barrier.
    fn collect(outcomes: Vec<EngineResult<WorkerStats>>) -> EngineResult<Vec<WorkerStats>> {
        let mut stats = Vec::with_capacity(outcomes.len());
        let mut first_error: Option<EngineError> = None;

        for outcome in outcomes {
            match outcome {
                Ok(s) => stats.push(s),
                Err(e) => {
                    tracing::error!(error = %e, "worker failed");
                    let replace = match &first_error {
                        None => true,
                        Some(EngineError::BarrierBroken) => e != EngineError::BarrierBroken,
                        Some(_) => false,
                    };
                    if replace {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    }
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
