//! # Command Line
//!
//! ```bash
//! toroid -c worlds/glider.txt -t 8 -p
//! toroid -c worlds/blinker.toml -v --delay-ms 250
//! toroid -l --host worlds.local
//! toroid -r glider.txt --download-to /tmp/glider.txt
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use toroid_core::SnapshotStrategy;
use toroid_remote::DEFAULT_PORT;

/// Parallel Game of Life on a torus.
///
/// Splits the board into contiguous row ranges, one worker thread each,
/// and steps all workers in lock-step through every generation.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "toroid")]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["config", "remote", "list"])
))]
pub struct Args {
    /// Local world file (`.toml` or the plain integer format)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fetch the named world from the server and run it
    #[arg(short = 'r', long, value_name = "NAME")]
    pub remote: Option<String>,

    /// List the worlds the server offers and exit
    #[arg(short = 'l', long)]
    pub list: bool,

    /// World server host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// World server port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Where a fetched world is saved before loading
    #[arg(long, value_name = "PATH", default_value = "remote_config.txt")]
    pub download_to: PathBuf,

    /// Worker threads (1 to the world's row count)
    #[arg(short = 't', long, default_value_t = 4)]
    pub threads: usize,

    /// Render every generation to the terminal
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print each worker's row range after the run
    #[arg(short = 'p', long)]
    pub partitions: bool,

    /// Pause after each rendered frame, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub delay_ms: u64,

    /// Copy the whole board per worker instead of owned rows plus halo
    #[arg(long)]
    pub full_snapshot: bool,
}

/// Where the world comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Local file.
    File(PathBuf),
    /// Named world on the server, saved to `download_to` first.
    Remote(String),
    /// Only list the server's worlds.
    List,
}

impl Args {
    /// The selected configuration source. Clap guarantees exactly one.
    #[must_use]
    pub fn source(&self) -> Source {
        if let Some(path) = &self.config {
            Source::File(path.clone())
        } else if let Some(name) = &self.remote {
            Source::Remote(name.clone())
        } else {
            Source::List
        }
    }

    /// Snapshot strategy chosen by `--full-snapshot`.
    #[must_use]
    pub const fn snapshot(&self) -> SnapshotStrategy {
        if self.full_snapshot {
            SnapshotStrategy::FullBoard
        } else {
            SnapshotStrategy::Halo
        }
    }

    /// Per-frame pause.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
