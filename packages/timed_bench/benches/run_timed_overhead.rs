//! Measures the fixed cost of a timed run: spawning the workers, one iteration each and the
//! final join. This is the noise floor below which timed results are meaningless.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::num::NonZero;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use timed_bench::{TimedRun, available_processors};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

// The shortest possible deadline, so every worker stops after its first iteration.
const MINIMAL_DURATION: Duration = Duration::from_nanos(1);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_timed_overhead");

    let single = TimedRun::new(NonZero::<usize>::MIN, MINIMAL_DURATION)
        .expect("duration is non-zero");

    group.bench_function("one_worker", |b| {
        b.iter(|| black_box(single.execute(|| || {}).expect("spawning one thread must succeed")));
    });

    let processors = available_processors();
    let all = TimedRun::new(processors, MINIMAL_DURATION).expect("duration is non-zero");

    group.bench_function("all_processors", |b| {
        b.iter(|| {
            black_box(
                all.execute(|| || {})
                    .expect("spawning one thread per processor must succeed"),
            )
        });
    });

    group.finish();
}
