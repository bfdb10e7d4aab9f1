use std::io;

use thiserror::Error;

/// Errors that can occur when configuring or executing a timed benchmark run.
///
/// Every variant except [`Error::Output`] is raised before any benchmark worker is spawned
/// or, for [`Error::WorkerSpawn`], instead of running with fewer workers than requested.
/// Workload correctness faults are not represented here: they are panics and are never caught.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The run was configured with a zero duration, which would leave no time to measure.
    #[error("benchmark duration must be greater than zero")]
    ZeroDuration,

    /// The benchmark filter is not a valid regular expression.
    #[error("invalid benchmark filter '{pattern}': {source}")]
    InvalidFilter {
        /// The filter as provided by the caller.
        pattern: String,

        /// Why the filter could not be compiled.
        #[source]
        source: regex::Error,
    },

    /// The operating system refused to start one of the benchmark workers.
    #[error("failed to spawn benchmark worker {worker_index} of {worker_count}: {source}")]
    WorkerSpawn {
        /// Zero-based index of the worker that could not be started.
        worker_index: usize,

        /// How many workers the run was configured for.
        worker_count: usize,

        /// The error reported by the operating system.
        #[source]
        source: io::Error,
    },

    /// A benchmark result line could not be written to the output.
    #[error("failed to write benchmark report: {source}")]
    Output {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A specialized `Result` type for timed benchmark operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn worker_spawn_message_names_worker() {
        let error = Error::WorkerSpawn {
            worker_index: 3,
            worker_count: 8,
            source: io::Error::other("out of threads"),
        };

        assert_eq!(
            error.to_string(),
            "failed to spawn benchmark worker 3 of 8: out of threads"
        );
    }

    #[test]
    fn invalid_filter_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let error = Error::InvalidFilter {
            pattern: "(".to_string(),
            source,
        };

        assert!(error.to_string().starts_with("invalid benchmark filter '('"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
