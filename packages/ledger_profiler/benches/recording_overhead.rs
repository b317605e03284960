//! Benchmarks to measure the overhead of recording into a profiler.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use ledger_profiler::Profiler;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_profiler_overhead");

    group.bench_function("baseline_empty", |b| {
        b.iter(|| {
            black_box(());
        });
    });

    let profiler = Profiler::new();
    profiler.start();

    group.bench_function("record_event", |b| {
        b.iter(|| {
            profiler.record_event(black_box("bench_event"), 1);
        });
    });

    group.bench_function("record_average", |b| {
        b.iter(|| {
            profiler.record_average(black_box("bench_average"), black_box(3.5));
        });
    });

    group.bench_function("begin_end_block", |b| {
        b.iter(|| {
            profiler.begin_block(black_box("bench_block"));
            profiler.end_block(black_box("bench_block"));
        });
    });

    group.bench_function("scoped_block", |b| {
        b.iter(|| {
            let _block = profiler.scoped_block(black_box("bench_scoped"));
        });
    });

    group.finish();

    // Keep the profiler data alive (and used) until the end.
    black_box(profiler.report(true));
}
