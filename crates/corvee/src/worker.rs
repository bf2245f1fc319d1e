//! The worker loop: wait, claim, run, repeat.
//!
//! Each worker is an OS thread bound to this loop for its entire lifetime.
//! Jobs execute with no queue lock held, so other workers claim and run
//! concurrently. A panicking job is caught, counted, and reported; it never
//! takes the worker down with it.

use crate::queue::{Dequeued, Shared};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Claim-and-run loop executed by every worker thread.
///
/// Runs until the shared termination flag is observed. The drain behavior at
/// that point is decided by the [`StopMode`] recorded in the flag, not here.
///
/// [`StopMode`]: crate::StopMode
pub(crate) fn worker_loop(_worker_id: usize, shared: Arc<Shared>) {
    #[cfg(feature = "tracing")]
    tracing::trace!("worker {_worker_id} started");

    loop {
        match shared.dequeue() {
            Dequeued::Job(job) => {
                let outcome = panic::catch_unwind(AssertUnwindSafe(job));
                shared.record_execution(outcome.is_err());

                if let Err(_payload) = outcome {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "worker {_worker_id} job panicked: {}",
                        panic_message(&_payload)
                    );
                }
            }
            Dequeued::Exit => break,
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("worker {_worker_id} stopped");
}

/// Best-effort rendering of a panic payload for the failure log.
#[cfg(feature = "tracing")]
fn panic_message(payload: &(dyn core::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
