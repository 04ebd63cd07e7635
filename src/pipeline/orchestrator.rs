use log::{debug, info, warn};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::engine::split::PdfSplitter;
use crate::engine::tools::{chunk_stem, find_output_collision, output_dir_for};
use crate::error::BatchError;
use crate::pipeline::{
    BatchHandle, BatchReport, DrainState, FailureSink, JobSource, Observer, Transform, WorkerPool,
    status_channel,
};
use crate::utils::config::available_threads;
use crate::{BatchConfig, BatchOpts, WorkItem};

/// Validate `opts`, enumerate `inputs` and start splitting on a background thread.
///
/// Fails before anything runs on invalid configuration ([`BatchError::Config`]), when no
/// PDF is found ([`BatchError::NoWork`]) or when two inputs would overwrite each other's
/// chunks ([`BatchError::OutputCollision`]). Once this returns `Ok`, the batch always runs to
/// completion and sends exactly one `Done`.
pub fn start_batch<P: AsRef<Path>>(inputs: &[P], opts: &BatchOpts) -> Result<BatchHandle, BatchError> {
    let config = opts.validate(available_threads())?;
    let items = enumerate_for(inputs, &config);
    if items.is_empty() {
        return Err(BatchError::NoWork);
    }
    check_output_paths(&items, &config.output_root)?;
    let splitter = PdfSplitter::new(&config.output_root);
    Ok(start_batch_with(items, config.concurrency, splitter))
}

/// Fail with [`BatchError::OutputCollision`] when two different inputs would write the same
/// chunk files under `output_root`.
pub fn check_output_paths(items: &[WorkItem], output_root: &Path) -> Result<(), BatchError> {
    match find_output_collision(items, output_root) {
        Some((first, second)) => Err(BatchError::OutputCollision {
            first: first.input.clone(),
            second: second.input.clone(),
            dir: output_dir_for(second, output_root),
            stem: chunk_stem(second).unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

/// Enumerate work items for a validated config.
pub fn enumerate_for<P: AsRef<Path>>(inputs: &[P], config: &BatchConfig) -> Vec<WorkItem> {
    JobSource::new(config.chunk_size)
        .dedupe(config.dedupe)
        .follow_links(config.follow_links)
        .enumerate(inputs)
}

/// Start a batch over prepared `items` with any transform. The coordinator thread runs the
/// pool, forwards a `Progress` message per completed job, then sends `Done` and returns the
/// aggregate through [`BatchHandle::wait`].
pub fn start_batch_with<T>(items: Vec<WorkItem>, concurrency: usize, transform: T) -> BatchHandle
where
    T: Transform + 'static,
{
    let (status_tx, status_rx) = status_channel();
    let pool = WorkerPool::new(concurrency);
    let total = items.len();
    info!("Starting {} job(s) (threads: {})", total, pool.limit());

    let coordinator = thread::spawn(move || {
        let aggregate = pool.run(items, &transform, |_, snapshot| {
            status_tx.progress(snapshot);
        });
        debug!(
            "batch finished: {}/{} processed, {} error(s)",
            aggregate.processed, aggregate.total, aggregate.errors
        );
        status_tx.done(&aggregate);
        aggregate
    });

    BatchHandle {
        status: status_rx,
        coordinator,
        total,
        concurrency: pool.limit(),
    }
}

/// Observer side of a batch: drain status on every `tick` until `Done`, collect the final
/// aggregate and, exactly when `Done` reports failures, hand them to `sink`.
pub fn observe_batch<O, S>(
    handle: BatchHandle,
    observer: &mut O,
    sink: &S,
    tick: Duration,
) -> Result<BatchReport, BatchError>
where
    O: Observer + ?Sized,
    S: FailureSink + ?Sized,
{
    let state = handle.status().poll_until_done(observer, tick);
    let aggregate = handle.wait()?;
    if state == DrainState::Disconnected {
        return Err(BatchError::CoordinatorLost);
    }

    let persisted = aggregate.has_failures().then(|| {
        let outcome = sink.persist(&aggregate.failures);
        if let Err(e) = &outcome {
            warn!("{}", e);
        }
        outcome
    });

    Ok(BatchReport {
        aggregate,
        persisted,
    })
}
