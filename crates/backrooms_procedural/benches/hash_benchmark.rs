//! Benchmark for the cell hash and wall rules.
//!
//! Every generated cell costs dozens of hash rolls, so this is the inner loop.
//!
//! Run with: cargo bench --package backrooms_procedural --bench hash_benchmark

use backrooms_procedural::{FeatureRules, MazeRules, SessionSeed};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn benchmark_hash_unit(c: &mut Criterion) {
    let hasher = SessionSeed::new("deadbeef00face55").hasher();

    let mut group = c.benchmark_group("cell_hash");
    group.throughput(Throughput::Elements(1024));
    group.bench_function("1024_rolls", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..1024i32 {
                acc += hasher.unit(black_box(i), black_box(-i), 300);
            }
            acc
        });
    });
    group.finish();
}

fn benchmark_seed_fingerprint(c: &mut Criterion) {
    let seed = SessionSeed::new("deadbeef00face55deadbeef");
    c.bench_function("seed_fingerprint", |b| b.iter(|| black_box(&seed).fingerprint()));
}

fn benchmark_wall_rules(c: &mut Criterion) {
    let seed = SessionSeed::new("deadbeef00face55");
    let maze = MazeRules::new(&seed);
    let features = FeatureRules::new(&seed);

    let mut group = c.benchmark_group("rules");
    group.throughput(Throughput::Elements(24 * 24));
    group.bench_function("walls_24x24", |b| {
        b.iter(|| {
            let mut walls = 0u32;
            for z in 0..24 {
                for x in 0..24 {
                    walls += u32::from(maze.is_wall_x(x, z)) + u32::from(maze.is_wall_z(x, z));
                }
            }
            black_box(walls)
        });
    });
    group.bench_function("furniture_open_24x24", |b| {
        b.iter(|| {
            (0..24)
                .flat_map(|z| (0..24).map(move |x| (x, z)))
                .filter(|&(x, z)| features.is_furniture_cell_open(x, z))
                .count()
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_hash_unit,
    benchmark_seed_fingerprint,
    benchmark_wall_rules,
);
criterion_main!(benches);
