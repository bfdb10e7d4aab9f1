use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when preparing or running the benchmark suite.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A corpus file could not be read.
    #[error("cannot read corpus file {}: {source}", .path.display())]
    CorpusRead {
        /// The file that could not be read.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A corpus file exists but contains no data, so there would be nothing to measure.
    #[error("corpus file {} is empty", .path.display())]
    EmptyCorpus {
        /// The empty file.
        path: PathBuf,
    },

    /// A workload pattern is not a valid regular expression.
    #[error("invalid workload pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as written in the workload definition.
        pattern: String,

        /// Why the pattern could not be compiled.
        #[source]
        source: regex::Error,
    },

    /// The benchmark runner rejected the configuration or failed while running.
    #[error(transparent)]
    Run(#[from] timed_bench::Error),
}

/// A specialized `Result` type for benchmark suite operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
