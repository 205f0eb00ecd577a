//! # Run Pipeline
//!
//! ```text
//! Source::List    ─► RemoteClient::list ─► names to stdout
//! Source::Remote  ─► RemoteClient::fetch_to_file ─┐
//! Source::File    ────────────────────────────────┴► WorldConfig::load
//!                    ─► Simulation::new ─► run ─► report
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use toroid_config::WorldConfig;
use toroid_core::{EngineConfig, FrameObserver, RunReport, Simulation};
use toroid_remote::RemoteClient;

use crate::cli::{Args, Source};
use crate::render::TerminalRenderer;
use crate::report::write_report;

/// Executes one invocation, writing listings and the report to `out`.
///
/// Returns the run report, or `None` when only listing.
///
/// # Errors
///
/// Any configuration, fetch or engine failure. Everything that can be
/// checked is checked before a worker thread starts.
pub fn run(args: &Args, out: &mut impl Write) -> Result<Option<RunReport>> {
    let path: PathBuf = match args.source() {
        Source::List => {
            let client = RemoteClient::new(args.host.as_str(), args.port);
            let names = client
                .list()
                .with_context(|| format!("listing worlds on {}:{}", args.host, args.port))?;
            for name in names {
                writeln!(out, "{name}")?;
            }
            return Ok(None);
        }
        Source::Remote(name) => {
            let client = RemoteClient::new(args.host.as_str(), args.port);
            let bytes = client
                .fetch_to_file(&name, &args.download_to)
                .with_context(|| format!("fetching world {name:?}"))?;
            tracing::info!(
                name = %name,
                bytes,
                path = %args.download_to.display(),
                "saved remote world"
            );
            args.download_to.clone()
        }
        Source::File(path) => path,
    };

    let world = WorldConfig::load(&path)
        .with_context(|| format!("loading world from {}", path.display()))?;
    let board = world.build_board()?;

    let config = EngineConfig::new(args.threads, world.iterations)
        .with_render(args.verbose)
        .with_snapshot(args.snapshot());
    let mut sim = Simulation::new(board, config).with_context(|| {
        format!("cannot run {} threads on a {}-row world", args.threads, world.rows)
    })?;

    tracing::debug!(config = ?sim.config(), rows = world.rows, cols = world.cols, "world ready");

    let renderer = args.verbose.then(|| TerminalRenderer::stdout(args.delay()));
    let observer = renderer.as_ref().map(|r| r as &dyn FrameObserver);
    let report = sim.run(observer).context("simulation aborted")?;

    write_report(out, &report, args.partitions)?;
    out.flush()?;
    Ok(Some(report))
}
