//! The per-job transform boundary.

use std::path::PathBuf;

use crate::WorkItem;
use crate::error::JobError;

/// Executes one job. Called concurrently from several workers with distinct items, so
/// implementations must not share mutable state between calls.
///
/// Returns the files written, or a [`JobError`] describing why the item failed. A panic is
/// not part of the contract; the worker pool catches it and records it as a fault.
pub trait Transform: Send + Sync {
    fn apply(&self, item: &WorkItem) -> Result<Vec<PathBuf>, JobError>;
}

impl<F> Transform for F
where
    F: Fn(&WorkItem) -> Result<Vec<PathBuf>, JobError> + Send + Sync,
{
    fn apply(&self, item: &WorkItem) -> Result<Vec<PathBuf>, JobError> {
        self(item)
    }
}
