//! Bounded worker pool: a fixed set of threads pulling items from a dispatch channel.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::debug;
use std::thread;

use crate::pipeline::error_handler::run_guarded;
use crate::pipeline::{ProgressAggregator, Transform};
use crate::{BatchAggregate, JobResult, ProgressSnapshot, WorkItem};

/// Runs a transform over a batch of items with at most `limit` executing at once.
#[derive(Clone, Copy, Debug)]
pub struct WorkerPool {
    limit: usize,
}

impl WorkerPool {
    /// `limit` below 1 is treated as 1.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run `transform` for every item and return the final aggregate.
    ///
    /// `on_result` is called on the calling thread, once per item, in completion order, right
    /// after the result has been recorded; it receives the totals including that result.
    /// Returns after every item has been passed to `on_result`.
    pub fn run<T, F>(&self, items: Vec<WorkItem>, transform: &T, on_result: F) -> BatchAggregate
    where
        T: Transform + ?Sized,
        F: FnMut(&JobResult, ProgressSnapshot),
    {
        let aggregator = ProgressAggregator::new(items.len());
        self.run_with(items, transform, &aggregator, on_result);
        aggregator.into_aggregate()
    }

    /// Same as [`WorkerPool::run`] but records into a caller-owned aggregator, so its
    /// snapshot can be read from elsewhere while the batch runs.
    pub fn run_with<T, F>(
        &self,
        items: Vec<WorkItem>,
        transform: &T,
        aggregator: &ProgressAggregator,
        mut on_result: F,
    ) where
        T: Transform + ?Sized,
        F: FnMut(&JobResult, ProgressSnapshot),
    {
        let total = items.len();
        if total == 0 {
            return;
        }
        let num_workers = self.limit.min(total);
        debug!("Running {} job(s) on {} worker(s)", total, num_workers);

        // Capacity = worker count: the dispatcher runs at most one slot ahead of each worker.
        let (item_tx, item_rx) = bounded::<WorkItem>(num_workers);
        let (result_tx, result_rx) = unbounded::<JobResult>();

        thread::scope(|s| {
            s.spawn(move || dispatch_loop(items, item_tx));

            for worker_id in 0..num_workers {
                let item_rx = item_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move || worker_loop(worker_id, item_rx, result_tx, transform));
            }

            // Dropping the last sender closes the channel so the collector loop ends once
            // every worker has exited.
            drop(item_rx);
            drop(result_tx);

            for result in result_rx.iter() {
                let snapshot = aggregator.record(&result);
                on_result(&result, snapshot);
            }
        });
    }
}

/// Feed items to the workers one at a time, blocking while all slots are taken.
///
/// This loop is the single place items enter the pool: a stop flag checked before each send
/// would end dispatch without touching in-flight jobs or the aggregator.
fn dispatch_loop(items: Vec<WorkItem>, item_tx: Sender<WorkItem>) {
    for item in items {
        if item_tx.send(item).is_err() {
            break;
        }
    }
    drop(item_tx);
}

/// Single worker: take items until the dispatch channel closes, send one result per item.
fn worker_loop<T: Transform + ?Sized>(
    worker_id: usize,
    item_rx: Receiver<WorkItem>,
    result_tx: Sender<JobResult>,
    transform: &T,
) {
    let mut done = 0_usize;
    while let Ok(item) = item_rx.recv() {
        let result = run_guarded(transform, item);
        if result_tx.send(result).is_err() {
            break;
        }
        done += 1;
    }
    debug!("worker {}: finished after {} job(s)", worker_id, done);
}
