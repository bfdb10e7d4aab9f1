//! Cost of a single iteration of each standard workload on one thread, for comparing against
//! the throughput the timed runner reports on many threads.

#![allow(missing_docs, reason = "No need for API documentation in benchmark code")]

use criterion::{Criterion, criterion_group, criterion_main};
use flate2::Compression;
use timed_bench_suite::text::shared_text;
use timed_bench_suite::workloads::gzip;
use timed_bench_suite::workloads::regex_match::Pattern;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let text = shared_text(256 * 1024);

    let mut group = c.benchmark_group("workload_iterations");

    let mut compress = gzip::prepare(&text, Compression::new(gzip::STANDARD_LEVEL));
    group.bench_function("gzip_256k", |b| {
        b.iter(|| compress());
    });

    let pattern = Pattern::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ$").unwrap();
    let mut search = pattern.prepare(&text);
    group.bench_function("match_easy0_256k", |b| {
        b.iter(|| search());
    });

    let pattern = Pattern::new("[ -~]*ABCDEFGHIJKLMNOPQRSTUVWXYZ$").unwrap();
    let mut search = pattern.prepare(&text);
    group.bench_function("match_hard_256k", |b| {
        b.iter(|| search());
    });

    group.finish();
}
