//! Error types for the worker pool.
//!
//! Every fallible pool operation funnels into the central [`Error`] enum.
//! Job failures are deliberately absent from it: a panicking job is isolated
//! inside its worker, counted in the [`StopSummary`], and never surfaced as a
//! pool error.
//!
//! [`StopSummary`]: crate::StopSummary

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for pool lifecycle and submission.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// `start` was called on a pool whose workers are already running (or
    /// that has already been stopped).
    #[error("pool is already started")]
    AlreadyStarted,

    /// A job was submitted after termination had been requested.
    #[error("pool is stopped and no longer accepts jobs")]
    Stopped,

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn a worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
