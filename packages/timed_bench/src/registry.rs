use regex::Regex;

use crate::Throughput;

/// The hot-path step of a workload, called repeatedly by a single worker.
pub type IterationStep = Box<dyn FnMut()>;

type Factory = Box<dyn Fn() -> IterationStep + Send + Sync>;
type ReportFormatter = Box<dyn Fn(&Throughput) -> String + Send + Sync>;

/// A named workload that can be executed by the runner.
///
/// The factory is called once on every worker thread to perform setup (allocate buffers,
/// compile patterns and so on) and returns the iteration step that the worker then calls
/// repeatedly. Factories must not share mutable state between workers.
///
/// # Examples
///
/// ```
/// use timed_bench::Benchmark;
///
/// let benchmark = Benchmark::new("vec/fill 4K", || {
///     let mut buffer = Vec::with_capacity(4096);
///     move || {
///         buffer.clear();
///         buffer.resize(4096, 0xAA_u8);
///     }
/// })
/// .with_report(|throughput| throughput.format_mib_per_second(4096));
///
/// assert_eq!(benchmark.name(), "vec/fill 4K");
/// ```
#[derive(derive_more::Debug)]
pub struct Benchmark {
    name: String,

    #[debug(ignore)]
    factory: Factory,

    #[debug(ignore)]
    report: ReportFormatter,
}

impl Benchmark {
    /// Creates a benchmark that reports its result in iterations per second.
    pub fn new<F, S>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: FnMut() + 'static,
    {
        Self {
            name: name.into(),
            factory: Box::new(move || Box::new(factory()) as IterationStep),
            report: Box::new(Throughput::format_iterations_per_second),
        }
    }

    /// Replaces the report formatter, which turns the aggregate result into the text printed
    /// after the benchmark name.
    #[must_use]
    pub fn with_report<R>(mut self, report: R) -> Self
    where
        R: Fn(&Throughput) -> String + Send + Sync + 'static,
    {
        self.report = Box::new(report);
        self
    }

    /// The name used for selection and printed in front of the result.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Performs per-worker setup and returns the iteration step for that worker.
    #[must_use]
    pub fn prepare(&self) -> IterationStep {
        (self.factory)()
    }

    /// Formats the aggregate result of a run of this benchmark.
    #[must_use]
    pub fn report(&self, throughput: &Throughput) -> String {
        (self.report)(throughput)
    }
}

/// An ordered list of benchmarks, from which the runner selects by name.
///
/// # Examples
///
/// ```
/// use regex::Regex;
/// use timed_bench::{Benchmark, Registry};
///
/// let mut registry = Registry::new();
/// registry
///     .register(Benchmark::new("hash/small", || || {}))
///     .register(Benchmark::new("hash/large", || || {}))
///     .register(Benchmark::new("sort/small", || || {}));
///
/// let filter = Regex::new("small").unwrap();
/// let selected: Vec<_> = registry.matching(&filter).map(|b| b.name()).collect();
///
/// assert_eq!(selected, ["hash/small", "sort/small"]);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    benchmarks: Vec<Benchmark>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a benchmark after all previously registered ones.
    pub fn register(&mut self, benchmark: Benchmark) -> &mut Self {
        self.benchmarks.push(benchmark);
        self
    }

    /// The number of registered benchmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether no benchmarks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    /// All benchmarks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Benchmark> {
        self.benchmarks.iter()
    }

    /// The benchmarks whose name contains a match for `filter`, in registration order.
    ///
    /// The search is not anchored: use `^` and `$` in the filter to match whole names.
    pub fn matching<'a>(&'a self, filter: &'a Regex) -> impl Iterator<Item = &'a Benchmark> {
        self.benchmarks
            .iter()
            .filter(move |benchmark| filter.is_match(&benchmark.name))
    }
}

impl FromIterator<Benchmark> for Registry {
    fn from_iter<T: IntoIterator<Item = Benchmark>>(iter: T) -> Self {
        Self {
            benchmarks: iter.into_iter().collect(),
        }
    }
}
