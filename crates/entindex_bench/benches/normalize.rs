//! Key normalization benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use entindex_bench::generate_batch;
use entindex_core::KeyNormalizer;

/// Benchmark single-component normalization.
fn bench_normalize_str(c: &mut Criterion) {
    let normalizer = KeyNormalizer::new();
    let mut group = c.benchmark_group("normalize_str");

    for input in ["7", "  000000123  ", "Mixed-Case-Code"] {
        group.bench_with_input(BenchmarkId::from_parameter(input.trim()), input, |b, input| {
            b.iter(|| normalizer.normalize_str(black_box(input)));
        });
    }
    group.finish();
}

/// Benchmark building keys for every row of a batch.
fn bench_batch_keys(c: &mut Criterion) {
    let normalizer = KeyNormalizer::new();
    let mut group = c.benchmark_group("batch_keys");

    for rows in [1_000, 10_000].iter() {
        let batch = generate_batch(*rows, 1_000);
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &batch, |b, batch| {
            b.iter(|| {
                normalizer
                    .batch_keys(black_box(batch), &["zsource", "customer_code"])
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize_str, bench_batch_keys);
criterion_main!(benches);
