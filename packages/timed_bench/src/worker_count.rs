use std::num::NonZero;

use many_cpus::ProcessorSet;

/// How many workers a benchmark run should use.
///
/// The requested count is never capped to the number of processors. Running more workers than
/// there are processors is allowed, so the reported throughput always belongs to the worker
/// count the caller asked for.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use timed_bench::WorkerCount;
///
/// assert_eq!(WorkerCount::from_requested(0), WorkerCount::AllProcessors);
///
/// let four = WorkerCount::from_requested(4);
/// assert_eq!(four.resolve(), NonZero::new(4).unwrap());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum WorkerCount {
    /// One worker for every processor available to the current process.
    #[default]
    AllProcessors,

    /// Exactly this many workers.
    Fixed(NonZero<usize>),
}

impl WorkerCount {
    /// Interprets a count from user input, where zero means "use every available processor".
    #[must_use]
    pub fn from_requested(requested: usize) -> Self {
        NonZero::new(requested).map_or(Self::AllProcessors, Self::Fixed)
    }

    /// Resolves the count into the concrete number of workers to spawn.
    #[must_use]
    pub fn resolve(self) -> NonZero<usize> {
        match self {
            Self::AllProcessors => available_processors(),
            Self::Fixed(count) => count,
        }
    }
}

/// The number of processors the current process is allowed to run on.
///
/// This honors the process affinity mask and resource quotas, and on Windows counts the
/// processors of every processor group, not only the group of the calling thread.
#[must_use]
pub fn available_processors() -> NonZero<usize> {
    NonZero::new(ProcessorSet::default().len())
        .expect("the default processor set always contains at least one processor")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn zero_means_all_processors() {
        assert_eq!(WorkerCount::from_requested(0), WorkerCount::AllProcessors);
    }

    #[test]
    fn nonzero_is_kept_as_is() {
        assert_eq!(
            WorkerCount::from_requested(7),
            WorkerCount::Fixed(NonZero::new(7).unwrap())
        );
    }

    #[test]
    fn fixed_is_not_capped_to_processors() {
        let processors = available_processors();
        let oversubscribed = processors.checked_add(5).unwrap();

        assert_eq!(
            WorkerCount::Fixed(oversubscribed).resolve(),
            oversubscribed
        );
    }

    #[test]
    fn all_processors_matches_detection() {
        assert_eq!(
            WorkerCount::AllProcessors.resolve(),
            available_processors()
        );
    }

    #[test]
    fn all_processors_matches_default_processor_set() {
        assert_eq!(available_processors().get(), ProcessorSet::default().len());
    }

    #[test]
    fn default_is_all_processors() {
        assert_eq!(WorkerCount::default(), WorkerCount::AllProcessors);
    }
}
