//! Benchmarks for puzzle generation.
//!
//! Measures the complete generation path (random givens plus uniqueness
//! checking) for a handful of fixed seeds, so runs are reproducible while
//! still covering different convergence behaviors.
//!
//! ```sh
//! cargo bench --bench generator
//! ```

use std::hint;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gridsage_generator::PuzzleGenerator;

const SEEDS: [u32; 3] = [1, 77, 4242];

fn bench_generate(c: &mut Criterion) {
    let generator = PuzzleGenerator::new();
    for seed in SEEDS {
        c.bench_with_input(BenchmarkId::new("generate", seed), &seed, |b, &seed| {
            b.iter(|| generator.generate(hint::black_box(seed)));
        });
    }
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
