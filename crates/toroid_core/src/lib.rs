//! # TOROID Core Engine
//!
//! Parallel, barrier-synchronized Game of Life on a toroidal grid:
//! - Fixed pool of worker threads, one per contiguous row range
//! - Three rendezvous points per generation
//! - No locks on cells: workers read private snapshots, write only their rows
//!
//! ## Architecture
//!
//! ```text
//!   Simulation ──owns──► Board
//!       │                  │ split()
//!       │          ┌───────┴────────┐
//!       │       BoardView      RowWriter × N
//!       │          │                │
//!       └─spawn──► Worker 0 … Worker N-1 ◄──► PhaseBarrier
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use toroid_core::{Board, EngineConfig, Simulation};
//!
//! let board = Board::random(1024, 1024, 0.3, 42)?;
//! let mut sim = Simulation::new(board, EngineConfig::new(8, 100))?;
//! let report = sim.run(None)?;
//! println!("{:?}", report.elapsed);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod barrier;
pub mod board;
pub mod engine;
pub mod error;
pub mod observer;
pub mod partition;
pub mod rule;
pub mod snapshot;
pub mod worker;

pub use barrier::{PhaseBarrier, PhaseRelease};
pub use board::{Board, BoardView, Cell, Grid, RowWriter};
pub use engine::{EngineConfig, RunReport, Simulation, WorkerReport};
pub use error::{EngineError, EngineResult};
pub use observer::{Frame, FrameObserver, FrameRecorder};
pub use partition::{Partition, RowRange};
pub use rule::{evolve_board, evolve_grid, next_state, step_grid};
pub use snapshot::{Snapshot, SnapshotStrategy};
pub use worker::{run_worker, Phase, PhaseEvent, WorkerContext, WorkerStats};
