//! # Run Report
//!
//! ```text
//!  Total time for 2 iterations of a 5x5 world is 0.000412 seconds
//! tid:  0: rows:  0:2 (3)
//! tid:  1: rows:  3:4 (2)
//! ```

use std::io::{self, Write};

use toroid_core::{RunReport, WorkerReport};

/// Timing line: iterations, `rows x cols`, seconds with six decimals.
#[must_use]
pub fn summary_line(report: &RunReport) -> String {
    format!(
        " Total time for {} iterations of a {}x{} world is {}.{:06} seconds",
        report.iterations,
        report.height,
        report.width,
        report.elapsed.as_secs(),
        report.elapsed.subsec_micros()
    )
}

/// Row assignment of one worker: first and last row inclusive, then count.
#[must_use]
pub fn partition_line(worker: &WorkerReport) -> String {
    format!(
        "tid:  {}: rows:  {}:{} ({})",
        worker.worker_id, worker.first_row, worker.last_row, worker.row_count
    )
}

/// Writes the summary and, if `partitions`, one line per worker.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_report(out: &mut impl Write, report: &RunReport, partitions: bool) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", summary_line(report))?;
    if partitions {
        for worker in &report.workers {
            writeln!(out, "{}", partition_line(worker))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use toroid_core::WorkerStats;

    fn report() -> RunReport {
        let worker = |worker_id, first_row, last_row| WorkerReport {
            worker_id,
            first_row,
            last_row,
            row_count: last_row - first_row + 1,
            stats: WorkerStats::default(),
        };
        RunReport {
            elapsed: Duration::from_micros(1_000_042),
            iterations: 2,
            width: 7,
            height: 5,
            live_cells: 3,
            workers: vec![worker(0, 0, 2), worker(1, 3, 4)],
        }
    }

    #[test]
    fn test_summary_is_rows_by_cols() {
        assert_eq!(
            summary_line(&report()),
            " Total time for 2 iterations of a 5x7 world is 1.000042 seconds"
        );
    }

    #[test]
    fn test_partition_lines_only_when_asked() {
        let mut quiet = Vec::new();
        write_report(&mut quiet, &report(), false).unwrap();
        assert!(!String::from_utf8(quiet).unwrap().contains("tid:"));

        let mut loud = Vec::new();
        write_report(&mut loud, &report(), true).unwrap();
        let text = String::from_utf8(loud).unwrap();
        assert!(text.ends_with("tid:  0: rows:  0:2 (3)\ntid:  1: rows:  3:4 (2)\n"));
    }
}
