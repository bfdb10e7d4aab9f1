#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runs a workload on many threads for a fixed wall-clock duration and reports how many
//! iterations all threads completed together.
//!
//! This package measures steady-state throughput of CPU-bound operations such as compression
//! or pattern matching. Instead of executing a fixed number of iterations, every worker keeps
//! iterating until a shared deadline passes, so the result is directly proportional to
//! throughput at the chosen level of parallelism.
//!
//! The core functionality includes:
//! - [`run_timed()`] and [`TimedRun`] - the timed parallel executor
//! - [`Benchmark`] and [`Registry`] - named workloads with a report format
//! - [`run()`] with [`RunConfig`] - selects benchmarks by name, runs them and prints one line each
//! - [`WorkerCount`] - requested parallelism, where zero means every available processor
//!
//! # Operating principles
//!
//! ## Workload factories
//!
//! A workload is a two-level closure. The outer closure is the factory, called exactly once on
//! every worker thread to perform setup. It returns the iteration step, which the worker calls
//! repeatedly. Each worker owns its own step exclusively, so the executor needs no locks and
//! the step does not need to be `Send`. Input data shared by all workers should be held in an
//! `Arc` and only read.
//!
//! ## Deadline
//!
//! All workers measure time from a single start timestamp taken before the first worker is
//! spawned. A worker checks the deadline after every completed iteration and never interrupts
//! one in progress, so the run may overrun the deadline by up to one iteration per worker.
//!
//! ## Failures
//!
//! Workloads signal a wrong result by panicking. The executor does not catch this: the panic
//! is resumed on the calling thread once all workers have stopped and no throughput number is
//! produced. Worker count is never silently reduced, either because the requested count exceeds
//! the processor count or because a thread cannot be spawned.
//!
//! # Example
//!
//! ```
//! use std::num::NonZero;
//! use std::time::Duration;
//!
//! use timed_bench::{Benchmark, Registry, RunConfig, WorkerCount, run};
//!
//! let mut registry = Registry::new();
//! registry.register(
//!     Benchmark::new("sum/1K", || {
//!         let numbers: Vec<u64> = (0..1024).collect();
//!         move || {
//!             std::hint::black_box(numbers.iter().sum::<u64>());
//!         }
//!     })
//!     .with_report(|throughput| throughput.format_mib_per_second(1024 * 8)),
//! );
//!
//! let config = RunConfig::default()
//!     .with_workers(WorkerCount::Fixed(NonZero::new(2).unwrap()))
//!     .with_duration(Duration::from_millis(50));
//!
//! let mut output = Vec::new();
//! let outcome = run(&registry, &config, &mut output).unwrap();
//!
//! assert_eq!(outcome.results().len(), 1);
//! assert!(String::from_utf8(output).unwrap().starts_with("sum/1K,"));
//! ```

mod error;
mod registry;
mod run_timed;
mod runner;
mod throughput;
mod worker_count;

pub use error::*;
pub use registry::*;
pub use run_timed::*;
pub use runner::*;
pub use throughput::*;
pub use worker_count::*;
