//! Parallel cleaning: one pool job per input line.
//!
//! Each job owns its `(index, line)` pair and a clone of the shared sink
//! handle; nothing borrowed survives past the submission call. Workers push
//! `(index, cleaned)` into the mutex-protected sink in whatever order they
//! finish, and the index restores submission order after the pool stops.

use crate::clean;
use core::num::NonZeroUsize;
use corvee::{StopMode, StopSummary, WorkerPool};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cleans every line on a worker pool and returns the results in input
/// order, together with the pool's execution accounting.
///
/// `workers` of `None` defers to the pool's host-parallelism default.
///
/// # Errors
///
/// Propagates pool errors ([`corvee::Error::Spawn`] in practice; the pool is
/// constructed, started, and stopped entirely within this call, so
/// submission cannot race a stop).
pub fn clean_lines(
    lines: Vec<String>,
    workers: Option<NonZeroUsize>,
) -> corvee::Result<(Vec<String>, StopSummary)> {
    let mut pool = match workers {
        Some(count) => WorkerPool::with_workers(count),
        None => WorkerPool::new(),
    };
    pool.start()?;

    let sink = Arc::new(Mutex::new(Vec::with_capacity(lines.len())));

    for (index, line) in lines.into_iter().enumerate() {
        let sink = Arc::clone(&sink);
        pool.submit(move || {
            let cleaned = clean::normalize(&line);
            sink.lock().push((index, cleaned));
        })?;
    }

    let summary = pool.stop(StopMode::Graceful);

    let mut rows = std::mem::take(&mut *sink.lock());
    rows.sort_unstable_by_key(|&(index, _)| index);
    let cleaned = rows.into_iter().map(|(_, text)| text).collect();

    Ok((cleaned, summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(count: usize) -> Vec<String> {
        (0..count)
            .map(|index| format!("Line {index}, I'm here"))
            .collect()
    }

    #[test]
    fn output_order_matches_input_order() {
        let lines = corpus(64);
        let (cleaned, summary) =
            clean_lines(lines, Some(NonZeroUsize::new(4).unwrap())).unwrap();

        assert_eq!(summary.executed, 64);
        assert_eq!(summary.failed, 0);
        for (index, line) in cleaned.iter().enumerate() {
            assert_eq!(line, &format!("line {index}, i am here"));
        }
    }

    #[test]
    fn single_worker_behaves_identically() {
        let lines = corpus(8);
        let (cleaned, summary) =
            clean_lines(lines, Some(NonZeroUsize::new(1).unwrap())).unwrap();

        assert_eq!(summary.executed, 8);
        assert_eq!(cleaned.len(), 8);
        assert_eq!(cleaned[0], "line 0, i am here");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let (cleaned, summary) = clean_lines(Vec::new(), None).unwrap();
        assert!(cleaned.is_empty());
        assert_eq!(summary, StopSummary::default());
    }
}
