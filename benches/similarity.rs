//! Benchmarks for the similarity kernels.
//!
//! Every strategy's cost is dominated by how many times these run, so the
//! per-call cost sets the scale for the comparison counts in a sweep.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use simpair::distance::{cosine_similarity, entropy, js_divergence};

const TOPIC_COUNTS: [usize; 5] = [10, 20, 50, 100, 300];

fn random_distributions(n: usize, dim: usize) -> Vec<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            let raw: Vec<f32> = (0..dim).map(|_| rng.random::<f32>() + 1e-3).collect();
            let sum: f32 = raw.iter().sum();
            raw.into_iter().map(|x| x / sum).collect()
        })
        .collect()
}

fn bench_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_similarity");

    for dim in TOPIC_COUNTS {
        group.throughput(Throughput::Elements(dim as u64));
        let docs = random_distributions(2, dim);
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
            bench.iter(|| cosine_similarity(black_box(&docs[0]), black_box(&docs[1])));
        });
    }

    group.finish();
}

fn bench_js_divergence(c: &mut Criterion) {
    let mut group = c.benchmark_group("js_divergence");

    for dim in TOPIC_COUNTS {
        group.throughput(Throughput::Elements(dim as u64));
        let docs = random_distributions(2, dim);
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
            bench.iter(|| js_divergence(black_box(&docs[0]), black_box(&docs[1])));
        });
    }

    group.finish();
}

fn bench_entropy(c: &mut Criterion) {
    let mut group = c.benchmark_group("entropy");

    for dim in TOPIC_COUNTS {
        group.throughput(Throughput::Elements(dim as u64));
        let docs = random_distributions(1, dim);
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |bench, _| {
            bench.iter(|| entropy(black_box(&docs[0])));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cosine, bench_js_divergence, bench_entropy);
criterion_main!(benches);
