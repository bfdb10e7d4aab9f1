#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compression and pattern matching benchmarks for the [`timed_bench`] parallel runner.
//!
//! The standard registry contains two groups of benchmarks:
//! - gzip compression of two corpus files, the digits of e (`e.txt`) and prose by Mark Twain
//!   (`mt.txt`), loaded once from a corpus directory;
//! - searches of 256 KiB of reproducible synthetic text for patterns that never occur in it.
//!
//! Every benchmark reports MiB/s of input processed by all workers together. Workloads verify
//! their own results and panic on a mismatch, which ends the run without a throughput number.
//!
//! # Example
//!
//! ```
//! use std::num::NonZero;
//! use std::time::Duration;
//!
//! use timed_bench::{RunConfig, WorkerCount};
//! use timed_bench_suite::{Corpus, standard_registry};
//!
//! let corpus = Corpus::from_texts(b"2.718281828".to_vec(), b"Twain".to_vec());
//! let registry = standard_registry(&corpus).unwrap();
//!
//! let config = RunConfig::default()
//!     .with_workers(WorkerCount::Fixed(NonZero::new(1).unwrap()))
//!     .with_duration(Duration::from_millis(20))
//!     .with_filter("^regexp/match easy0,");
//!
//! let mut output = Vec::new();
//! timed_bench::run(&registry, &config, &mut output).unwrap();
//!
//! assert!(String::from_utf8(output).unwrap().starts_with("regexp/match easy0, 256K,"));
//! ```

mod corpus;
mod error;
mod standard;
pub mod text;
pub mod workloads;

pub use corpus::*;
pub use error::*;
pub use standard::*;
