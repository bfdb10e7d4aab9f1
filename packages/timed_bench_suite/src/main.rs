#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the benchmark suite.
//!
//! This module is excluded from mutation testing because testing process entry/exit behavior
//! is impractical - it requires spawning subprocesses and checking exit codes.

use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::{self, ExitCode};
use std::time::Duration;

use argh::FromArgs;
use timed_bench::{RunConfig, WorkerCount};
use timed_bench_suite::run_standard;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs each selected benchmark on many threads for a fixed duration and prints one
/// "name,throughput" line per benchmark.
#[derive(FromArgs)]
struct Args {
    /// number of worker threads, 0 for one per available processor
    #[argh(option, short = 'c', default = "0")]
    threads: usize,

    /// seconds to run each benchmark for
    #[argh(option, short = 't', default = "10")]
    duration: u64,

    /// regular expression selecting the benchmarks to run by name
    #[argh(option, short = 'r', default = "RunConfig::DEFAULT_FILTER.to_string()")]
    run: String,

    /// directory containing the e.txt and mt.txt corpus files
    #[argh(option, default = "PathBuf::from(\"corp\")")]
    corpus_dir: PathBuf,
}

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    init_logging();
    abort_on_panic();

    let config = RunConfig::default()
        .with_workers(WorkerCount::from_requested(args.threads))
        .with_duration(Duration::from_secs(args.duration))
        .with_filter(args.run);

    let mut stdout = io::stdout().lock();

    match run_standard(&args.corpus_dir, &config, &mut stdout) {
        Ok(outcome) => {
            info!(benchmarks = outcome.results().len(), "all selected benchmarks completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` and showing `info` and above by default.
#[cfg_attr(test, mutants::skip)]
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Terminates the process once the default hook has reported a panic on any thread.
///
/// A panic in a workload means it produced a wrong result, after which no throughput number
/// from any worker is meaningful.
#[cfg_attr(test, mutants::skip)]
fn abort_on_panic() {
    let report = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        report(info);
        process::abort();
    }));
}
