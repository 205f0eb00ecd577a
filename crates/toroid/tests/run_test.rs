//! # Runner Integration Test
//!
//! Drives the whole pipeline: argument parsing, world loading, remote
//! fetch, simulation and report.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use toroid::{run, Args};

const BLINKER: &str = "5 5 2 3\n1 1\n2 1\n3 1\n";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("toroid_run_{}_{name}", std::process::id()))
}

fn write_world(name: &str, body: &str) -> PathBuf {
    let path = temp_path(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn args(list: &[&str]) -> Args {
    Args::parse_from(std::iter::once("toroid").chain(list.iter().copied()))
}

/// One-shot world server answering a single request.
fn serve_once(response: &'static str) -> (u16, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        reader.into_inner().write_all(response.as_bytes()).unwrap();
        line
    });
    (port, handle)
}

#[test]
fn test_blinker_from_file() {
    let path = write_world("blinker.txt", BLINKER);
    let mut out = Vec::new();

    let report = run(&args(&["-c", path.to_str().unwrap(), "-t", "2", "-p"]), &mut out)
        .unwrap()
        .unwrap();

    // Period two: back to three live cells in the starting row.
    assert_eq!(report.live_cells, 3);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(" Total time for 2 iterations of a 5x5 world is "), "{text}");
    assert!(text.contains("tid:  0: rows:  0:2 (3)\n"));
    assert!(text.contains("tid:  1: rows:  3:4 (2)\n"));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_toml_world_with_full_snapshot() {
    let path = write_world(
        "block.toml",
        "rows = 4\ncols = 4\niterations = 3\nlive = [[1, 1], [2, 1], [1, 2], [2, 2]]\n",
    );
    let mut out = Vec::new();

    let report = run(
        &args(&["-c", path.to_str().unwrap(), "-t", "4", "--full-snapshot"]),
        &mut out,
    )
    .unwrap()
    .unwrap();

    assert_eq!(report.live_cells, 4);
    assert_eq!(report.cells_changed(), 0);
    assert!(!String::from_utf8(out).unwrap().contains("tid:"));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_too_many_threads_fails_before_running() {
    let path = write_world("small.txt", BLINKER);
    let mut out = Vec::new();

    let err = run(&args(&["-c", path.to_str().unwrap(), "-t", "6"]), &mut out).unwrap_err();

    assert!(format!("{err:#}").contains("6 threads"), "{err:#}");
    assert!(out.is_empty());
    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_names_the_path() {
    let mut out = Vec::new();
    let err = run(&args(&["-c", "/nonexistent/world.txt"]), &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/world.txt"));
}

#[test]
fn test_remote_world_is_saved_then_run() {
    let (port, server) = serve_once(BLINKER);
    let download = temp_path("remote.txt");
    let port_arg = port.to_string();
    let mut out = Vec::new();

    let report = run(
        &args(&[
            "-r",
            "blinker.txt",
            "--host",
            "127.0.0.1",
            "--port",
            port_arg.as_str(),
            "--download-to",
            download.to_str().unwrap(),
            "-t",
            "1",
        ]),
        &mut out,
    )
    .unwrap()
    .unwrap();

    assert_eq!(server.join().unwrap(), "get blinker.txt\n");
    assert_eq!(std::fs::read_to_string(&download).unwrap(), BLINKER);
    assert_eq!(report.iterations, 2);
    std::fs::remove_file(download).ok();
}

#[test]
fn test_list_prints_names() {
    let (port, server) = serve_once("blinker.txt\nglider.txt\n");
    let port_arg = port.to_string();
    let mut out = Vec::new();

    let report = run(&args(&["-l", "--host", "127.0.0.1", "--port", port_arg.as_str()]), &mut out).unwrap();

    assert!(report.is_none());
    assert_eq!(server.join().unwrap(), "list\n");
    assert_eq!(String::from_utf8(out).unwrap(), "blinker.txt\nglider.txt\n");
}
