use std::time::Duration;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// The aggregate result of one benchmark, as handed to a report formatter.
///
/// Rates are computed against the configured benchmark duration rather than the measured
/// wall-clock time, which is slightly longer because workers finish their last iteration
/// after the deadline.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use timed_bench::Throughput;
///
/// let throughput = Throughput::new(2048, Duration::from_secs(2));
///
/// assert_eq!(throughput.format_iterations_per_second(), "1024.00 iter/s");
/// assert_eq!(throughput.format_mib_per_second(1024), "1.00 MiB/s");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Throughput {
    total_iterations: u64,
    duration: Duration,
}

impl Throughput {
    /// Describes `total_iterations` completed by all workers during `duration`.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is zero, as no rate can be derived from it. The runner only uses
    /// durations that [`TimedRun`][crate::TimedRun] has already accepted.
    #[must_use]
    pub fn new(total_iterations: u64, duration: Duration) -> Self {
        assert!(
            !duration.is_zero(),
            "throughput cannot be calculated over a zero duration"
        );

        Self {
            total_iterations,
            duration,
        }
    }

    /// Iterations completed by all workers together.
    #[must_use]
    pub fn total_iterations(&self) -> u64 {
        self.total_iterations
    }

    /// The configured benchmark duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Iterations per second across all workers.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "throughput is a statistic, precision loss beyond 2^53 iterations is irrelevant"
    )]
    pub fn iterations_per_second(&self) -> f64 {
        self.total_iterations as f64 / self.duration.as_secs_f64()
    }

    /// Bytes per second across all workers, if every iteration processes
    /// `bytes_per_iteration` bytes.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "throughput is a statistic, precision loss beyond 2^53 bytes is irrelevant"
    )]
    pub fn bytes_per_second(&self, bytes_per_iteration: usize) -> f64 {
        self.iterations_per_second() * bytes_per_iteration as f64
    }

    /// Mebibytes (1024 * 1024 bytes) per second across all workers, if every iteration
    /// processes `bytes_per_iteration` bytes.
    #[must_use]
    pub fn mib_per_second(&self, bytes_per_iteration: usize) -> f64 {
        self.bytes_per_second(bytes_per_iteration) / BYTES_PER_MIB
    }

    /// The default report format: iterations per second with two decimals.
    #[must_use]
    pub fn format_iterations_per_second(&self) -> String {
        format!("{:.2} iter/s", self.iterations_per_second())
    }

    /// Report format for workloads that process a fixed number of bytes per iteration.
    #[must_use]
    pub fn format_mib_per_second(&self, bytes_per_iteration: usize) -> String {
        format!("{:.2} MiB/s", self.mib_per_second(bytes_per_iteration))
    }
}
