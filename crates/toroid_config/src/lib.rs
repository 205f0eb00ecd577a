//! # TOROID World Configuration
//!
//! Loads the world a run starts from: dimensions, iteration count and the
//! initially live cells.
//!
//! ## Example
//!
//! ```rust,ignore
//! use toroid_config::WorldConfig;
//!
//! let world = WorldConfig::load("worlds/blinker.txt")?;
//! let board = world.build_board()?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod world;

pub use error::{ConfigError, ConfigResult};
pub use world::{CellCoord, WorldConfig};
