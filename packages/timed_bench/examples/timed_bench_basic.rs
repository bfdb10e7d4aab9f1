//! Compares the throughput of a small hashing workload on one worker and on every processor.
//!
//! Each worker builds its own input buffer in the factory, so the measured step only hashes.

#![allow(missing_docs, reason = "No need for API documentation in example code")]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::hint::black_box;
use std::num::NonZero;
use std::time::Duration;

use timed_bench::{Throughput, TimedRun, available_processors};

const DURATION: Duration = Duration::from_secs(1);
const INPUT_SIZE: usize = 16 * 1024;

fn main() {
    let processors = available_processors();

    for workers in [NonZero::<usize>::MIN, processors] {
        let run = TimedRun::new(workers, DURATION).expect("duration is non-zero");

        let summary = run
            .execute(|| {
                let input: Vec<u8> = (0..INPUT_SIZE)
                    .map(|i| u8::try_from(i % 251).expect("remainder of division by 251 fits in u8"))
                    .collect();

                move || {
                    let mut hasher = DefaultHasher::new();
                    input.hash(&mut hasher);
                    black_box(hasher.finish());
                }
            })
            .expect("workers must start");

        let throughput = Throughput::new(summary.total_iterations(), run.duration());

        println!(
            "{workers} worker(s): {} ({}) over {:?}",
            throughput.format_mib_per_second(INPUT_SIZE),
            throughput.format_iterations_per_second(),
            summary.elapsed()
        );
    }
}
