//! Shared queue state: one mutex, one condvar, one termination flag.
//!
//! All workers block on the same [`Condvar`] and re-check the wake predicate
//! ("job available or terminate requested") on every wake, so spurious
//! wakeups are harmless. The termination flag is monotonic: once set it is
//! never cleared, and it records which [`StopMode`] was requested so the
//! drain decision is unambiguous.

use crate::{Error, Result, StopMode};
use core::sync::atomic::{AtomicU64, Ordering};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// A single, owned, zero-argument unit of deferred work.
///
/// Jobs carry no return channel; any output must be written by the job
/// itself into a caller-synchronized sink that the closure owns (moved
/// `Arc`s and data, never borrowed loop variables).
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Outcome of a blocking dequeue.
pub(crate) enum Dequeued {
    /// A job was claimed under the lock; the caller now owns it.
    Job(Job),
    /// Termination was observed; the worker should exit its loop.
    Exit,
}

#[derive(Default)]
struct QueueState {
    jobs: VecDeque<Job>,
    /// `None` while running. Set exactly once by [`Shared::request_stop`].
    stop: Option<StopMode>,
}

/// Queue state shared between the pool handle and its workers.
pub(crate) struct Shared {
    state: Mutex<QueueState>,
    available: Condvar,
    executed: AtomicU64,
    failed: AtomicU64,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            available: Condvar::new(),
            executed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Appends a job to the tail of the queue and wakes one waiting worker.
    ///
    /// If no worker is currently waiting the notification is lost, which is
    /// fine: the job stays queued and the next worker to finish its current
    /// job will claim it. Never blocks the submitter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stopped`] if termination has already been requested.
    pub(crate) fn enqueue(&self, job: Job) -> Result<()> {
        {
            let mut state = self.state.lock();
            if state.stop.is_some() {
                return Err(Error::Stopped);
            }
            state.jobs.push_back(job);
        }
        self.available.notify_one();
        Ok(())
    }

    /// Blocks until a job can be claimed or termination is observed.
    ///
    /// Under a graceful stop the queue is checked *before* the exit
    /// decision, so every job enqueued ahead of the stop request drains.
    /// Under an immediate stop the worker exits without touching the queue;
    /// anything still queued was already cleared and counted by
    /// [`Self::request_stop`].
    pub(crate) fn dequeue(&self) -> Dequeued {
        let mut state = self.state.lock();
        loop {
            match state.stop {
                Some(StopMode::Immediate) => return Dequeued::Exit,
                Some(StopMode::Graceful) => {
                    return match state.jobs.pop_front() {
                        Some(job) => Dequeued::Job(job),
                        None => Dequeued::Exit,
                    };
                }
                None => match state.jobs.pop_front() {
                    Some(job) => return Dequeued::Job(job),
                    None => self.available.wait(&mut state),
                },
            }
        }
    }

    /// Sets the termination flag and wakes every worker.
    ///
    /// Returns the number of jobs discarded from the queue, or `None` if a
    /// stop was already requested (the flag is monotonic; the first call
    /// wins). In immediate mode the queue is cleared under the same lock
    /// that sets the flag, so no racing worker can claim a job that is about
    /// to be reported as discarded.
    pub(crate) fn request_stop(&self, mode: StopMode) -> Option<u64> {
        let discarded = {
            let mut state = self.state.lock();
            if state.stop.is_some() {
                return None;
            }
            state.stop = Some(mode);
            match mode {
                StopMode::Graceful => 0,
                StopMode::Immediate => {
                    let dropped = state.jobs.len() as u64;
                    state.jobs.clear();
                    dropped
                }
            }
        };
        self.available.notify_all();
        Some(discarded)
    }

    /// Removes and counts jobs left behind after every worker has exited.
    ///
    /// Nonzero only when a graceful stop hit a pool whose workers were never
    /// started; those jobs cannot execute and are reported as discarded
    /// rather than silently lost.
    pub(crate) fn drain_remaining(&self) -> u64 {
        let mut state = self.state.lock();
        let remaining = state.jobs.len() as u64;
        state.jobs.clear();
        remaining
    }

    /// Records one finished execution attempt. A panicked job still counts
    /// as executed ("completed with failure") and additionally as failed.
    pub(crate) fn record_execution(&self, panicked: bool) {
        self.executed.fetch_add(1, Ordering::Relaxed);
        if panicked {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn executed(&self) -> u64 {
        self.executed.load(Ordering::Relaxed)
    }

    pub(crate) fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}
