//! Pool lifecycle: construct, start, submit, stop.
//!
//! [`WorkerPool`] owns the shared queue state and the worker threads. The
//! lifecycle is explicit and caller-controlled: a pool is constructed with a
//! worker count, started exactly once, fed jobs from any thread, and stopped
//! in one of two modes. There is no ambient process-wide instance; whoever
//! needs a pool owns one.

use crate::queue::Shared;
use crate::worker::worker_loop;
use crate::{Error, Result};
use core::num::NonZeroUsize;
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};

/// How [`WorkerPool::stop`] treats jobs still queued when termination is
/// requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopMode {
    /// Workers drain every job already queued at the moment termination is
    /// requested before exiting. No enqueued job is lost.
    Graceful,
    /// Workers exit as soon as they observe termination. Still-queued jobs
    /// are discarded and the count is reported in the [`StopSummary`].
    Immediate,
}

/// Execution accounting returned by [`WorkerPool::stop`].
///
/// `executed + discarded` always equals the number of jobs accepted by
/// `submit`, in either stop mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StopSummary {
    /// Jobs that ran to completion, including those that panicked.
    pub executed: u64,
    /// Subset of `executed` whose closure panicked.
    pub failed: u64,
    /// Jobs removed from the queue without running: immediate mode, or a
    /// stop on a pool whose workers were never started.
    pub discarded: u64,
}

/// A fixed-size pool of worker threads over a shared job queue.
///
/// Submission is thread-safe and never blocks (the queue is unbounded).
/// Workers block on a condition variable while idle, so an empty pool costs
/// nothing but the parked threads. Jobs are claimed by exactly one worker
/// and executed exactly once; global execution order across workers is not
/// guaranteed.
///
/// The pool guarantees safe hand-off of job ownership only. A job's own side
/// effects (writing into a shared collection, say) must be synchronized by
/// the caller. There is no timeout anywhere: a hung job blocks its worker
/// and, transitively, `stop`.
///
/// # Example
///
/// ```
/// use corvee::{StopMode, WorkerPool};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// let mut pool = WorkerPool::new();
/// pool.start()?;
///
/// let counter = Arc::new(AtomicU64::new(0));
/// for _ in 0..100 {
///     let counter = Arc::clone(&counter);
///     pool.submit(move || {
///         counter.fetch_add(1, Ordering::Relaxed);
///     })?;
/// }
///
/// let summary = pool.stop(StopMode::Graceful);
/// assert_eq!(summary.executed, 100);
/// assert_eq!(counter.load(Ordering::Relaxed), 100);
/// # Ok::<(), corvee::Error>(())
/// ```
pub struct WorkerPool {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
    workers: NonZeroUsize,
    started: bool,
    summary: Option<StopSummary>,
}

impl WorkerPool {
    /// Creates a pool sized to the host's available parallelism.
    ///
    /// No threads are spawned until [`Self::start`] is called.
    pub fn new() -> Self {
        Self::with_workers(default_worker_count())
    }

    /// Creates a pool with an explicit worker count.
    pub fn with_workers(workers: NonZeroUsize) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            handles: Vec::new(),
            workers,
            started: false,
            summary: None,
        }
    }

    /// The worker count this pool was configured with.
    pub fn worker_count(&self) -> usize {
        self.workers.get()
    }

    /// Spawns the worker threads.
    ///
    /// Jobs submitted before `start` simply wait in the queue and are
    /// claimed as soon as workers exist.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyStarted`] if the pool was already started (or
    ///   stopped).
    /// - [`Error::Spawn`] if the OS refuses a thread. Workers spawned before
    ///   the failure are shut down before the error is returned, leaving the
    ///   pool stopped.
    pub fn start(&mut self) -> Result<()> {
        if self.started || self.summary.is_some() {
            return Err(Error::AlreadyStarted);
        }
        self.started = true;

        for worker_id in 0..self.workers.get() {
            let shared = Arc::clone(&self.shared);
            let spawned = Builder::new()
                .name(format!("corvee-worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, shared));

            match spawned {
                Ok(handle) => self.handles.push(handle),
                Err(source) => {
                    self.stop(StopMode::Immediate);
                    return Err(Error::Spawn(source));
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("pool started with {} workers", self.handles.len());

        Ok(())
    }

    /// Appends a job to the queue and wakes one idle worker.
    ///
    /// Safe to call from any thread, including from inside a running job via
    /// a [`Submitter`]. Never blocks the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stopped`] once termination has been requested; a
    /// rejected submission is surfaced, never a silent no-op.
    pub fn submit<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.enqueue(Box::new(job))
    }

    /// Returns a cheap, cloneable submission handle.
    ///
    /// The handle shares the pool's queue but not its lifecycle, so running
    /// jobs can enqueue follow-up work without borrowing the pool itself.
    pub fn submitter(&self) -> Submitter {
        Submitter {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Signals termination, wakes all workers, and joins every worker thread
    /// before returning.
    ///
    /// In [`StopMode::Graceful`] every job queued at the moment of the call
    /// executes before its worker exits. In [`StopMode::Immediate`] the
    /// queue is cleared up front and workers exit as soon as they observe
    /// the flag; in-flight jobs still run to completion (a claimed job is
    /// never interrupted).
    ///
    /// Idempotent: the second and later calls return the summary of the
    /// first without further effect, regardless of the mode passed.
    pub fn stop(&mut self, mode: StopMode) -> StopSummary {
        if let Some(summary) = self.summary {
            return summary;
        }

        let mut discarded = self.shared.request_stop(mode).unwrap_or(0);

        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                // Job panics are caught inside the loop; reaching this arm
                // means the loop itself went down.
                #[cfg(feature = "tracing")]
                tracing::error!("worker thread panicked outside of a job");
            }
        }

        // A stop on a never-started pool leaves the queue intact; count
        // those jobs as discarded instead of losing them silently.
        discarded += self.shared.drain_remaining();

        let summary = StopSummary {
            executed: self.shared.executed(),
            failed: self.shared.failed(),
            discarded,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "pool stopped: {} executed ({} failed), {} discarded",
            summary.executed,
            summary.failed,
            summary.discarded
        );

        self.summary = Some(summary);
        summary
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WorkerPool {
    /// A pool dropped without an explicit `stop` performs a graceful stop,
    /// so worker threads are never leaked or detached.
    fn drop(&mut self) {
        if self.summary.is_none() {
            self.stop(StopMode::Graceful);
        }
    }
}

/// Cheap, cloneable submission handle detached from the pool's lifecycle.
///
/// Obtained from [`WorkerPool::submitter`]. Submissions fail with
/// [`Error::Stopped`] once termination has been requested, exactly as they
/// do on the pool itself.
#[derive(Clone)]
pub struct Submitter {
    shared: Arc<Shared>,
}

impl Submitter {
    /// See [`WorkerPool::submit`].
    pub fn submit<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.enqueue(Box::new(job))
    }
}

fn default_worker_count() -> NonZeroUsize {
    // num_cpus never reports 0, but the clamp keeps the NonZeroUsize
    // construction honest.
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}
