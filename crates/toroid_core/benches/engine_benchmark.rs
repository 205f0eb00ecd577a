//! # Engine Benchmark
//!
//! Measures:
//! 1. Generations per second against worker count
//! 2. Full-board snapshots vs halo snapshots
//! 3. The single-threaded reference step as a baseline

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use toroid_core::{step_grid, Board, EngineConfig, Simulation, SnapshotStrategy};

const SIZE: usize = 512;
const GENERATIONS: usize = 10;

fn soup() -> Board {
    Board::random(SIZE, SIZE, 0.3, 42).expect("valid dimensions")
}

fn bench_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_workers");
    group.throughput(Throughput::Elements((SIZE * SIZE * GENERATIONS) as u64));
    group.sample_size(20);

    for workers in [1, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("halo", workers), &workers, |b, &workers| {
            b.iter(|| {
                let mut sim = Simulation::new(soup(), EngineConfig::new(workers, GENERATIONS))
                    .expect("valid config");
                black_box(sim.run(None).expect("run completes"));
            });
        });
    }

    group.finish();
}

fn bench_snapshot_strategy(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_snapshot");
    group.sample_size(20);
    let workers = 8;

    for (name, strategy) in [
        ("full_board", SnapshotStrategy::FullBoard),
        ("halo", SnapshotStrategy::Halo),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let config = EngineConfig::new(workers, GENERATIONS).with_snapshot(strategy);
                let mut sim = Simulation::new(soup(), config).expect("valid config");
                black_box(sim.run(None).expect("run completes"));
            });
        });
    }

    group.finish();
}

fn bench_reference_step(c: &mut Criterion) {
    let grid = soup().to_grid();
    c.bench_function("reference_step", |b| {
        b.iter(|| black_box(step_grid(black_box(&grid))));
    });
}

criterion_group!(benches, bench_workers, bench_snapshot_strategy, bench_reference_step);
criterion_main!(benches);
