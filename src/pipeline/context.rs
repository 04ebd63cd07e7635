//! Handles shared between the batch coordinator and its observer.

use std::thread::JoinHandle;

use crate::error::{BatchError, PersistError};
use crate::pipeline::StatusReceiver;
use crate::{BatchAggregate, FailureRecord};

/// Persists the failure list of a finished batch. Called at most once per batch, and only
/// with a non-empty list.
pub trait FailureSink {
    fn persist(&self, failures: &[FailureRecord]) -> Result<(), PersistError>;
}

/// A running batch. Returned by [`start_batch`](crate::pipeline::start_batch).
///
/// Poll [`BatchHandle::status`] from the observing thread; call [`BatchHandle::wait`] after
/// `Done` (or at any time, to block until the batch ends) for the final aggregate.
pub struct BatchHandle {
    pub(crate) status: StatusReceiver,
    pub(crate) coordinator: JoinHandle<BatchAggregate>,
    pub(crate) total: usize,
    pub(crate) concurrency: usize,
}

impl BatchHandle {
    pub fn status(&self) -> &StatusReceiver {
        &self.status
    }

    /// Number of work items in the batch.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Worker count the batch runs with.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Block until the batch finishes and return the final aggregate.
    pub fn wait(self) -> Result<BatchAggregate, BatchError> {
        self.coordinator
            .join()
            .map_err(|_| BatchError::CoordinatorLost)
    }
}

/// What the observer ends up with: the final aggregate and the outcome of persisting
/// failures, if there were any.
#[derive(Debug)]
pub struct BatchReport {
    pub aggregate: BatchAggregate,
    /// None when there was nothing to persist.
    pub persisted: Option<Result<(), PersistError>>,
}

impl BatchReport {
    pub fn persist_error(&self) -> Option<&PersistError> {
        self.persisted.as_ref().and_then(|r| r.as_ref().err())
    }
}
