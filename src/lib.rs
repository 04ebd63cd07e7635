//! pagesplit: split PDFs into page-range chunks across a bounded worker pool.
//!
//! A batch is discovered ([`pipeline::JobSource`]), run on at most N worker threads
//! ([`pipeline::WorkerPool`]), counted ([`pipeline::ProgressAggregator`]) and reported to an
//! observer on another thread through status messages ([`pipeline::StatusReceiver`]).

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{BatchError, ConfigError, JobError, PersistError, SplitError};
pub use pipeline::{BatchHandle, BatchReport, observe_batch, start_batch, start_batch_with};
pub use utils::config::resolve_concurrency;

use std::path::Path;

/// Result alias used by the public pagesplit API
pub type Result<T> = std::result::Result<T, BatchError>;

/// Split everything under `inputs` and block until done. No observer: status messages are
/// drained and dropped. Failures are returned in the aggregate, not persisted.
///
/// ```ignore
/// let opts = pagesplit::BatchOpts { output_root: "out".into(), ..Default::default() };
/// let agg = pagesplit::split_all(&["scans/"], &opts)?;
/// println!("{}/{} ok", agg.successes(), agg.total);
/// ```
pub fn split_all<P: AsRef<Path>>(inputs: &[P], opts: &BatchOpts) -> Result<BatchAggregate> {
    let handle = start_batch(inputs, opts)?;
    while handle.status().next_blocking().is_some() {}
    handle.wait()
}
