//! Benchmarks for mockingbird-report aggregation and rendering.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mockingbird_core::{ErrorValue, TestOutcome};
use mockingbird_report::{FormatterRegistry, ResultAggregator};

const CATEGORIES: [&str; 4] = ["Login", "Cart", "Search", "Payments"];

fn outcomes(n: usize) -> Vec<TestOutcome> {
    (0..n)
        .map(|i| {
            let name = format!("{}_case_{i}", CATEGORIES[i % CATEGORIES.len()]);
            let duration = Duration::from_micros((i as u64 * 37) % 5_000);
            match i % 10 {
                0 => TestOutcome::failed(name, duration, ErrorValue::timeout("slow")),
                1 => TestOutcome::failed(name, duration, ErrorValue::network("reset")),
                2 => TestOutcome::skipped(name),
                _ => TestOutcome::passed(name, duration),
            }
        })
        .collect()
}

fn aggregate_benchmark(c: &mut Criterion) {
    let aggregator = ResultAggregator::new();
    let mut group = c.benchmark_group("aggregate_detailed");

    for size in [100, 1_000, 10_000] {
        let input = outcomes(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| aggregator.aggregate_detailed(std::hint::black_box(input)))
        });
    }

    group.finish();
}

fn render_benchmark(c: &mut Criterion) {
    let report = ResultAggregator::new().aggregate_detailed(&outcomes(1_000));
    let registry = FormatterRegistry::with_defaults();
    let mut group = c.benchmark_group("render_detailed");

    for format in registry.formats() {
        group.bench_function(format, |b| {
            b.iter(|| registry.render_detailed(format, std::hint::black_box(&report)))
        });
    }

    group.finish();
}

criterion_group!(benches, aggregate_benchmark, render_benchmark);
criterion_main!(benches);
