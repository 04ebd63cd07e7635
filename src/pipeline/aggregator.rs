//! Thread-safe batch counters and failure list.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{BatchAggregate, FailureRecord, JobResult, ProgressSnapshot};

/// Accumulates one [`JobResult`] per completed job. All mutation of the batch state goes
/// through [`ProgressAggregator::record`], which holds the lock for the whole
/// read-modify-write, so concurrent callers never lose or double-count an update.
#[derive(Debug)]
pub struct ProgressAggregator {
    state: Mutex<BatchAggregate>,
}

impl ProgressAggregator {
    pub fn new(total: usize) -> Self {
        Self {
            state: Mutex::new(BatchAggregate::new(total)),
        }
    }

    /// Count `result` and return the totals right after it.
    pub fn record(&self, result: &JobResult) -> ProgressSnapshot {
        let mut state = self.lock();
        debug_assert!(state.processed < state.total, "more results than items");
        state.processed += 1;
        if let JobResult::Failure { item, reason } = result {
            state.errors += 1;
            state.failures.push(FailureRecord {
                input: item.input.clone(),
                description: reason.to_string(),
                fault: reason.is_fault(),
            });
        }
        state.snapshot()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().snapshot()
    }

    /// Final aggregate (counts plus failures in completion order).
    pub fn into_aggregate(self) -> BatchAggregate {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, BatchAggregate> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
