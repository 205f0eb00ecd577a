//! # TOROID Runner
//!
//! ```bash
//! toroid -c worlds/glider.txt -t 4 -v
//! RUST_LOG=toroid_core=debug toroid -c worlds/soup.toml -t 16 -p
//! ```

use std::io;
use std::process::ExitCode;

use clap::Parser;
use toroid::Args;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // stderr keeps log lines out of rendered frames
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "parsed arguments");

    match toroid::run(&args, &mut io::stdout()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
