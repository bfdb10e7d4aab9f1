use std::io;
use std::num::NonZero;
use std::panic;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::{Error, Result};

/// Runs a workload on `workers` threads until `duration` has elapsed and returns the total
/// number of iterations completed by all workers together.
///
/// This is a shorthand for [`TimedRun::new()`] followed by [`TimedRun::execute()`]. Use those
/// directly if you also need the per-worker counts or the measured wall-clock time.
///
/// # Errors
///
/// Returns [`Error::ZeroDuration`] if `duration` is zero and [`Error::WorkerSpawn`] if a worker
/// thread cannot be started.
///
/// # Panics
///
/// If the factory or the iteration step panics on any worker, the panic is resumed on the
/// calling thread once all workers have stopped. No iteration count is returned in that case.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
/// use std::time::Duration;
///
/// use timed_bench::run_timed;
///
/// let total = run_timed(
///     || {
///         let mut buffer = Vec::with_capacity(64);
///         move || {
///             buffer.clear();
///             buffer.extend_from_slice(b"hello");
///         }
///     },
///     NonZero::new(2).unwrap(),
///     Duration::from_millis(10),
/// )
/// .unwrap();
///
/// assert!(total >= 2);
/// ```
pub fn run_timed<F, S>(factory: F, workers: NonZero<usize>, duration: Duration) -> Result<u64>
where
    F: Fn() -> S + Sync,
    S: FnMut(),
{
    Ok(TimedRun::new(workers, duration)?
        .execute(factory)?
        .total_iterations())
}

/// Configuration of one timed benchmark run: how many workers to use and for how long.
///
/// The configuration is validated on creation and cannot change afterwards. A `TimedRun`
/// carries no state between executions, so the same value can be executed any number of times.
///
/// # Execution
///
/// 1. A start timestamp is recorded once, before any worker exists.
/// 2. Exactly `workers` threads are spawned. Each one calls the workload factory once to
///    create its own private iteration step.
/// 3. Each worker calls its iteration step repeatedly. After every completed call it checks the
///    time elapsed since the shared start timestamp and stops once the duration has passed.
///    An iteration in progress is never interrupted, so a worker may overrun the deadline by
///    up to one iteration and always completes at least one iteration.
/// 4. All workers are joined and their counts summed. There is no timeout on the join, so a
///    workload that never returns hangs the run.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
/// use std::time::Duration;
///
/// use timed_bench::TimedRun;
///
/// let run = TimedRun::new(NonZero::new(3).unwrap(), Duration::from_millis(20)).unwrap();
///
/// let summary = run
///     .execute(|| || {
///         std::hint::black_box((0..100_u64).sum::<u64>());
///     })
///     .unwrap();
///
/// assert_eq!(summary.worker_count(), 3);
/// assert!(summary.elapsed() >= Duration::from_millis(20));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimedRun {
    workers: NonZero<usize>,
    duration: Duration,
}

impl TimedRun {
    /// Creates the configuration for a run with `workers` threads lasting `duration`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroDuration`] if `duration` is zero.
    pub fn new(workers: NonZero<usize>, duration: Duration) -> Result<Self> {
        if duration.is_zero() {
            return Err(Error::ZeroDuration);
        }

        Ok(Self { workers, duration })
    }

    /// How many workers the run will spawn.
    #[must_use]
    pub fn workers(&self) -> NonZero<usize> {
        self.workers
    }

    /// How long every worker keeps starting new iterations.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Executes the run, blocking until every worker has finished.
    ///
    /// The factory is shared by reference between the workers and called exactly once on each
    /// worker thread. The iteration step it returns stays on that thread and is never shared,
    /// so it does not need to be `Send`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerSpawn`] if a worker thread cannot be started. Workers that were
    /// already started run until the deadline before the error is returned.
    ///
    /// # Panics
    ///
    /// Resumes the panic of the first failed worker (in worker index order) on the calling
    /// thread. The failure is not isolated and no partial result is produced.
    pub fn execute<F, S>(&self, factory: F) -> Result<RunSummary>
    where
        F: Fn() -> S + Sync,
        S: FnMut(),
    {
        self.execute_with_spawn_check(factory, |_| Ok(()))
    }

    /// Same as [`execute()`][Self::execute] but consults `spawn_check` with the worker index
    /// before spawning each worker, treating an error from it as a failure to spawn.
    fn execute_with_spawn_check<F, S, C>(&self, factory: F, spawn_check: C) -> Result<RunSummary>
    where
        F: Fn() -> S + Sync,
        S: FnMut(),
        C: Fn(usize) -> io::Result<()>,
    {
        let worker_count = self.workers.get();
        let duration = self.duration;
        let factory = &factory;

        debug!(worker_count, ?duration, "timed run starting");

        // Every worker measures its deadline from this one timestamp.
        let start = Instant::now();

        let worker_iterations = thread::scope(|scope| -> Result<Box<[u64]>> {
            let mut handles = Vec::with_capacity(worker_count);

            for worker_index in 0..worker_count {
                // Workers already spawned are joined by the scope even if a later spawn fails.
                let handle = spawn_check(worker_index)
                    .and_then(|()| {
                        thread::Builder::new()
                            .name(format!("timed-bench-{worker_index}"))
                            .spawn_scoped(scope, move || {
                                worker_entrypoint(factory, start, duration, worker_index)
                            })
                    })
                    .map_err(|source| Error::WorkerSpawn {
                        worker_index,
                        worker_count,
                        source,
                    })?;

                handles.push(handle);
            }

            trace!(worker_count, "all workers spawned, waiting for deadline");

            Ok(handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(iterations) => iterations,
                    Err(payload) => panic::resume_unwind(payload),
                })
                .collect())
        })?;

        let summary = RunSummary {
            worker_iterations,
            elapsed: start.elapsed(),
        };

        debug!(
            worker_count,
            total_iterations = summary.total_iterations(),
            elapsed = ?summary.elapsed,
            "timed run complete"
        );

        Ok(summary)
    }
}

#[cfg_attr(test, mutants::skip)] // Mutating the deadline check just makes the worker spin forever.
fn worker_entrypoint<F, S>(
    factory: &F,
    start: Instant,
    duration: Duration,
    worker_index: usize,
) -> u64
where
    F: Fn() -> S,
    S: FnMut(),
{
    let mut step = factory();
    let mut iterations: u64 = 0;

    trace!(worker_index, "worker prepared, starting iterations");

    loop {
        step();

        iterations = iterations
            .checked_add(1)
            .expect("a worker cannot complete more than u64::MAX iterations in any real duration");

        if start.elapsed() >= duration {
            break;
        }
    }

    trace!(worker_index, iterations, "worker reached deadline");

    iterations
}

/// The outcome of one timed benchmark run.
///
/// Holds exactly one iteration count per worker, available only after every worker has been
/// joined.
#[derive(Clone, Debug)]
#[must_use = "the iteration counts are the only product of a benchmark run"]
pub struct RunSummary {
    worker_iterations: Box<[u64]>,
    elapsed: Duration,
}

impl RunSummary {
    /// The sum of the iterations completed by all workers.
    #[must_use]
    pub fn total_iterations(&self) -> u64 {
        self.worker_iterations
            .iter()
            .try_fold(0_u64, |total, &count| total.checked_add(count))
            .expect("the sum of per-worker iteration counts cannot realistically overflow u64")
    }

    /// The iterations completed by each worker, in worker index order.
    pub fn worker_iterations(&self) -> impl Iterator<Item = u64> + '_ {
        self.worker_iterations.iter().copied()
    }

    /// How many workers reported a result. Always equal to the configured worker count.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.worker_iterations.len()
    }

    /// Wall-clock time from the start timestamp until the last worker was joined.
    ///
    /// This is at least the configured duration and exceeds it by no more than the longest
    /// single iteration plus worker setup and join overhead.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Real timing logic in tests is not desirable.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::sync::atomic::{self, AtomicUsize};

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(TimedRun: Send, Sync);
    assert_impl_all!(RunSummary: Send, Sync);

    const SHORT: Duration = Duration::from_millis(10);

    fn detect_wrong_result() {
        panic!("workload produced a wrong result");
    }

    fn workers(count: usize) -> NonZero<usize> {
        NonZero::new(count).unwrap()
    }

    #[test]
    fn zero_duration_is_rejected() {
        let result = TimedRun::new(workers(1), Duration::ZERO);

        assert!(matches!(result, Err(Error::ZeroDuration)));
    }

    #[test]
    fn zero_duration_never_calls_factory() {
        let factory_calls = AtomicUsize::new(0);

        let result = run_timed(
            || {
                factory_calls.fetch_add(1, atomic::Ordering::Relaxed);
                || {}
            },
            workers(2),
            Duration::ZERO,
        );

        assert!(matches!(result, Err(Error::ZeroDuration)));
        assert_eq!(factory_calls.load(atomic::Ordering::Relaxed), 0);
    }

    #[test]
    fn factory_called_once_per_worker() {
        let factory_calls = AtomicUsize::new(0);

        let summary = TimedRun::new(workers(4), SHORT)
            .unwrap()
            .execute(|| {
                factory_calls.fetch_add(1, atomic::Ordering::Relaxed);
                || {}
            })
            .unwrap();

        assert_eq!(factory_calls.load(atomic::Ordering::Relaxed), 4);
        assert_eq!(summary.worker_count(), 4);
    }

    #[test]
    fn every_worker_completes_at_least_one_iteration() {
        // The step is slower than the whole run, so the deadline passes during the first call.
        let summary = TimedRun::new(workers(3), Duration::from_millis(1))
            .unwrap()
            .execute(|| || thread::sleep(Duration::from_millis(20)))
            .unwrap();

        assert!(summary.worker_iterations().all(|count| count == 1));
        assert_eq!(summary.total_iterations(), 3);
    }

    #[test]
    fn total_is_sum_of_step_invocations() {
        let invocations = Arc::new(AtomicUsize::new(0));

        let summary = TimedRun::new(workers(2), SHORT)
            .unwrap()
            .execute(|| {
                let invocations = Arc::clone(&invocations);
                move || {
                    invocations.fetch_add(1, atomic::Ordering::Relaxed);
                }
            })
            .unwrap();

        assert_eq!(
            summary.total_iterations(),
            u64::try_from(invocations.load(atomic::Ordering::Relaxed)).unwrap()
        );
    }

    #[test]
    fn step_state_is_not_send() {
        // The step never leaves the worker thread that created it.
        let summary = TimedRun::new(workers(2), SHORT)
            .unwrap()
            .execute(|| {
                let local = Rc::new(Cell::new(0_u64));
                move || local.set(local.get().wrapping_add(1))
            })
            .unwrap();

        assert_eq!(summary.worker_count(), 2);
    }

    #[test]
    fn elapsed_is_at_least_duration() {
        let summary = TimedRun::new(workers(2), SHORT)
            .unwrap()
            .execute(|| || {})
            .unwrap();

        assert!(summary.elapsed() >= SHORT);
    }

    #[test]
    fn run_is_reusable() {
        let run = TimedRun::new(workers(2), Duration::from_millis(5)).unwrap();

        let first = run.execute(|| || {}).unwrap();
        let second = run.execute(|| || {}).unwrap();

        assert_eq!(first.worker_count(), 2);
        assert_eq!(second.worker_count(), 2);
    }

    #[test]
    fn spawn_failure_reported_after_started_workers_finish() {
        let duration = Duration::from_millis(50);
        let factory_calls = &AtomicUsize::new(0);
        let iterations = &AtomicUsize::new(0);

        let started = Instant::now();

        let result = TimedRun::new(workers(4), duration)
            .unwrap()
            .execute_with_spawn_check(
                move || {
                    factory_calls.fetch_add(1, atomic::Ordering::Relaxed);
                    move || {
                        iterations.fetch_add(1, atomic::Ordering::Relaxed);
                    }
                },
                |worker_index| {
                    if worker_index == 2 {
                        Err(io::Error::other("thread limit reached"))
                    } else {
                        Ok(())
                    }
                },
            );

        assert!(matches!(
            result,
            Err(Error::WorkerSpawn {
                worker_index: 2,
                worker_count: 4,
                ..
            })
        ));

        // The two workers that did start ran until the deadline and were joined.
        assert_eq!(factory_calls.load(atomic::Ordering::Relaxed), 2);
        assert!(started.elapsed() >= duration);

        let iterations_at_return = iterations.load(atomic::Ordering::Relaxed);
        assert!(iterations_at_return >= 2);

        thread::sleep(Duration::from_millis(20));
        assert_eq!(iterations.load(atomic::Ordering::Relaxed), iterations_at_return);
    }

    #[test]
    fn spawn_failure_of_first_worker_starts_nothing() {
        let factory_calls = AtomicUsize::new(0);

        let result = TimedRun::new(workers(3), SHORT)
            .unwrap()
            .execute_with_spawn_check(
                || {
                    factory_calls.fetch_add(1, atomic::Ordering::Relaxed);
                    || {}
                },
                |_| Err(io::Error::other("thread limit reached")),
            );

        assert!(matches!(
            result,
            Err(Error::WorkerSpawn { worker_index: 0, .. })
        ));
        assert_eq!(factory_calls.load(atomic::Ordering::Relaxed), 0);
    }

    #[test]
    #[should_panic(expected = "workload produced a wrong result")]
    fn step_panic_is_propagated() {
        let _summary = TimedRun::new(workers(2), SHORT)
            .unwrap()
            .execute(|| detect_wrong_result)
            .unwrap();
    }

    #[test]
    #[should_panic(expected = "setup failed")]
    fn factory_panic_is_propagated() {
        let _summary = TimedRun::new(workers(1), SHORT)
            .unwrap()
            .execute(|| -> fn() { panic!("setup failed") })
            .unwrap();
    }
}
