//! Per-worker setup and iteration steps for the benchmarks of the standard registry.
//!
//! Every `prepare` function here is a workload factory: it performs setup on the calling worker
//! and returns the step that the worker then calls until the deadline. Steps panic if they
//! detect a wrong result.

pub mod gzip;
pub mod regex_match;
