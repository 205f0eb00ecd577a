//! # TOROID
//!
//! Command line front end for the parallel torus engine. The binary is a
//! thin wrapper over [`app::run`]; the pieces live here so they can be
//! tested without a terminal or a process boundary.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod app;
pub mod cli;
pub mod render;
pub mod report;

pub use app::run;
pub use cli::{Args, Source};
pub use render::{format_frame, TerminalRenderer};
pub use report::{partition_line, summary_line, write_report};
