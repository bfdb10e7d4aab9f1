use std::io::Write;
use std::time::Duration;

use regex::Regex;
use tracing::{info, warn};

use crate::{Error, Registry, Result, Throughput, TimedRun, WorkerCount, available_processors};

/// Everything the runner needs to know to execute a selection of benchmarks.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use timed_bench::{RunConfig, WorkerCount};
///
/// let config = RunConfig::default()
///     .with_workers(WorkerCount::from_requested(2))
///     .with_duration(Duration::from_millis(100))
///     .with_filter("gzip");
///
/// assert_eq!(config.filter(), "gzip");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunConfig {
    workers: WorkerCount,
    duration: Duration,
    filter: String,
}

impl RunConfig {
    /// The per-benchmark duration used when none is configured.
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);

    /// The filter used when none is configured, selecting every benchmark.
    pub const DEFAULT_FILTER: &'static str = ".*";

    /// Sets how many workers each benchmark runs on.
    #[must_use]
    pub fn with_workers(mut self, workers: WorkerCount) -> Self {
        self.workers = workers;
        self
    }

    /// Sets how long each benchmark runs.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the regular expression that selects benchmarks by name.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// How many workers each benchmark runs on.
    #[must_use]
    pub fn workers(&self) -> WorkerCount {
        self.workers
    }

    /// How long each benchmark runs.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The regular expression that selects benchmarks by name.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: WorkerCount::AllProcessors,
            duration: Self::DEFAULT_DURATION,
            filter: Self::DEFAULT_FILTER.to_string(),
        }
    }
}

/// The result of one benchmark executed by [`run()`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BenchmarkResult {
    name: String,
    total_iterations: u64,
    report: String,
}

impl BenchmarkResult {
    /// The name of the benchmark.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterations completed by all workers together.
    #[must_use]
    pub fn total_iterations(&self) -> u64 {
        self.total_iterations
    }

    /// The formatted result, as printed after the benchmark name.
    #[must_use]
    pub fn report(&self) -> &str {
        &self.report
    }
}

/// What a call to [`run()`] did.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[must_use]
pub struct RunOutcome {
    results: Vec<BenchmarkResult>,
}

impl RunOutcome {
    /// One entry per executed benchmark, in registration order.
    #[must_use]
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }
}

/// Executes every benchmark in `registry` whose name matches the configured filter and writes
/// one `name,report` line per benchmark to `out`.
///
/// The whole configuration is validated before the first benchmark starts. A filter that
/// matches no benchmark is not an error: nothing is executed and nothing is written.
///
/// # Errors
///
/// Returns [`Error::InvalidFilter`] or [`Error::ZeroDuration`] for an invalid configuration,
/// [`Error::WorkerSpawn`] if a benchmark cannot start its workers and [`Error::Output`] if a
/// result line cannot be written.
///
/// # Panics
///
/// A workload that panics ends the whole run: the panic propagates out of this function and
/// no line is written for the failing benchmark.
pub fn run(registry: &Registry, config: &RunConfig, out: &mut impl Write) -> Result<RunOutcome> {
    let filter = Regex::new(&config.filter).map_err(|source| Error::InvalidFilter {
        pattern: config.filter.clone(),
        source,
    })?;

    let workers = config.workers.resolve();
    let timed_run = TimedRun::new(workers, config.duration)?;
    let processors = available_processors();

    info!(
        workers = workers.get(),
        processors = processors.get(),
        duration = ?config.duration,
        "benchmark run configured"
    );

    if workers > processors {
        warn!(
            workers = workers.get(),
            processors = processors.get(),
            "more workers than available processors, results include scheduling contention"
        );
    }

    let mut results = Vec::new();

    for benchmark in registry.matching(&filter) {
        info!(benchmark = benchmark.name(), "running benchmark");

        let total_iterations = timed_run
            .execute(|| benchmark.prepare())?
            .total_iterations();

        let report = benchmark.report(&Throughput::new(total_iterations, timed_run.duration()));

        writeln!(out, "{},{report}", benchmark.name())
            .map_err(|source| Error::Output { source })?;

        results.push(BenchmarkResult {
            name: benchmark.name().to_string(),
            total_iterations,
            report,
        });
    }

    Ok(RunOutcome { results })
}
