//! Worker pool, aggregator and status channel: counting, isolation and ordering properties.

mod common;

use common::{item_index, items};
use pagesplit::pipeline::{
    DrainState, Observer, ProgressAggregator, WorkerPool, run_guarded, start_batch_with,
    status_channel,
};
use pagesplit::{
    BatchAggregate, FailureReason, JobError, JobResult, ProgressSnapshot, StatusMessage, WorkItem,
};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

fn ok_transform(item: &WorkItem) -> Result<Vec<PathBuf>, JobError> {
    Ok(vec![item.input.clone()])
}

/// Fails items whose index is in `bad` with "corrupt".
fn failing_on(bad: &'static [usize]) -> impl Fn(&WorkItem) -> Result<Vec<PathBuf>, JobError> + Send + Sync {
    move |item: &WorkItem| {
        if bad.contains(&item_index(item)) {
            Err("corrupt".into())
        } else {
            Ok(vec![])
        }
    }
}

fn failure_inputs(agg: &BatchAggregate) -> BTreeSet<PathBuf> {
    agg.failures.iter().map(|f| f.input.clone()).collect()
}

/// Collect every message of a finished batch.
fn all_messages(rx: &pagesplit::pipeline::StatusReceiver) -> Vec<StatusMessage> {
    let mut out = Vec::new();
    while let Some(msg) = rx.next_blocking() {
        out.push(msg);
    }
    out
}

// --- WorkerPool ---

#[test]
fn test_every_item_reported_once() {
    for limit in [1, 2, 3, 8, 64] {
        let mut seen: HashMap<usize, usize> = HashMap::new();
        let agg = WorkerPool::new(limit).run(items(25), &ok_transform, |result, _| {
            *seen.entry(item_index(result.item())).or_default() += 1;
        });
        assert_eq!(seen.len(), 25, "limit {limit}");
        assert!(seen.values().all(|&n| n == 1), "limit {limit}");
        assert_eq!(agg.processed, 25);
        assert_eq!(agg.total, 25);
        assert_eq!(agg.errors, 0);
        assert!(agg.failures.is_empty());
    }
}

#[test]
fn test_empty_batch() {
    let mut calls = 0;
    let agg = WorkerPool::new(4).run(Vec::new(), &ok_transform, |_, _| calls += 1);
    assert_eq!(calls, 0);
    assert_eq!(agg.total, 0);
    assert_eq!(agg.processed, 0);
}

#[test]
fn test_zero_limit_treated_as_one() {
    let pool = WorkerPool::new(0);
    assert_eq!(pool.limit(), 1);
    let agg = pool.run(items(3), &ok_transform, |_, _| {});
    assert_eq!(agg.processed, 3);
}

#[test]
fn test_concurrency_never_exceeds_limit() {
    let running = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);
    let transform = |item: &WorkItem| -> Result<Vec<PathBuf>, JobError> {
        let now = running.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(5));
        running.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![item.input.clone()])
    };
    let agg = WorkerPool::new(3).run(items(30), &transform, |_, _| {});
    assert_eq!(agg.processed, 30);
    let peak = peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak {peak} exceeded limit");
    assert!(peak >= 1);
}

#[test]
fn test_progress_monotonic_and_bounded() {
    let mut last = 0;
    WorkerPool::new(4).run(items(40), &failing_on(&[1, 5, 9, 30]), |_, s| {
        assert_eq!(s.processed, last + 1);
        assert!(s.errors <= s.processed);
        assert!(s.processed <= s.total);
        assert_eq!(s.total, 40);
        last = s.processed;
    });
    assert_eq!(last, 40);
}

#[test]
fn test_single_failure_isolated() {
    let agg = WorkerPool::new(4).run(items(12), &failing_on(&[5]), |_, _| {});
    assert_eq!(agg.processed, 12);
    assert_eq!(agg.errors, 1);
    assert_eq!(agg.successes(), 11);
    assert_eq!(agg.failures.len(), 1);
    assert_eq!(agg.failures[0].input, PathBuf::from("/in/item5.pdf"));
    assert_eq!(agg.failures[0].description, "corrupt");
    assert!(!agg.failures[0].fault);
}

#[test]
fn test_panic_converted_to_fault() {
    let transform = |item: &WorkItem| -> Result<Vec<PathBuf>, JobError> {
        if item_index(item) == 4 {
            panic!("page tree exploded");
        }
        Ok(vec![])
    };
    let mut results = Vec::new();
    let agg = WorkerPool::new(2).run(items(10), &transform, |r, _| {
        results.push((item_index(r.item()), r.is_failure()))
    });
    assert_eq!(results.len(), 10);
    assert_eq!(agg.processed, 10);
    assert_eq!(agg.errors, 1);
    assert_eq!(results.iter().filter(|(_, failed)| *failed).count(), 1);
    let f = &agg.failures[0];
    assert_eq!(f.input, PathBuf::from("/in/item4.pdf"));
    assert!(f.fault);
    assert_eq!(f.description, "unexpected fault: page tree exploded");
}

#[test]
fn test_panic_with_formatted_message() {
    let transform = |item: &WorkItem| -> Result<Vec<PathBuf>, JobError> {
        panic!("bad item {}", item_index(item));
    };
    let agg = WorkerPool::new(3).run(items(5), &transform, |_, _| {});
    assert_eq!(agg.errors, 5);
    assert!(agg.failures.iter().all(|f| f.fault));
    assert!(
        agg.failures
            .iter()
            .any(|f| f.description == "unexpected fault: bad item 2")
    );
}

#[test]
fn test_limit_does_not_change_outcome() {
    let bad: &'static [usize] = &[0, 7, 13, 19];
    let one = WorkerPool::new(1).run(items(20), &failing_on(bad), |_, _| {});
    let eight = WorkerPool::new(8).run(items(20), &failing_on(bad), |_, _| {});
    assert_eq!(one.total, eight.total);
    assert_eq!(one.processed, eight.processed);
    assert_eq!(one.errors, eight.errors);
    assert_eq!(failure_inputs(&one), failure_inputs(&eight));
}

#[test]
fn test_limit_one_runs_in_submission_order() {
    let mut order = Vec::new();
    WorkerPool::new(1).run(items(6), &ok_transform, |r, _| order.push(item_index(r.item())));
    assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
}

// --- run_guarded ---

#[test]
fn test_run_guarded_success_keeps_outputs() {
    let item = WorkItem::new("/in/a.pdf", "/in", 2);
    let result = run_guarded(&ok_transform, item.clone());
    match result {
        JobResult::Success { item: got, outputs } => {
            assert_eq!(got, item);
            assert_eq!(outputs, vec![PathBuf::from("/in/a.pdf")]);
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn test_run_guarded_error_is_transform_failure() {
    let t = |_: &WorkItem| -> Result<Vec<PathBuf>, JobError> { Err("unreadable".into()) };
    match run_guarded(&t, WorkItem::new("/in/a.pdf", "/in", 2)) {
        JobResult::Failure { reason, .. } => {
            assert_eq!(reason, FailureReason::Transform("unreadable".into()))
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

// --- ProgressAggregator ---

#[test]
fn test_aggregator_concurrent_records() {
    let per_thread = 250;
    let threads = 8;
    let agg = Arc::new(ProgressAggregator::new(per_thread * threads));
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let agg = Arc::clone(&agg);
            thread::spawn(move || {
                for i in 0..per_thread {
                    let item = WorkItem::new(format!("/in/t{t}_{i}.pdf"), "/in", 1);
                    let result = if i % 10 == 0 {
                        JobResult::Failure {
                            item,
                            reason: FailureReason::Transform("x".into()),
                        }
                    } else {
                        JobResult::Success {
                            item,
                            outputs: vec![],
                        }
                    };
                    let s = agg.record(&result);
                    assert!(s.errors <= s.processed && s.processed <= s.total);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let agg = Arc::into_inner(agg).unwrap().into_aggregate();
    assert_eq!(agg.processed, per_thread * threads);
    assert_eq!(agg.errors, threads * per_thread / 10);
    assert_eq!(agg.failures.len(), agg.errors);
    assert_eq!(agg.successes() + agg.errors, agg.processed);
}

#[test]
fn test_aggregator_snapshot_matches_record() {
    let agg = ProgressAggregator::new(2);
    let item = WorkItem::new("/in/a.pdf", "/in", 1);
    let s = agg.record(&JobResult::Failure {
        item,
        reason: FailureReason::Fault("boom".into()),
    });
    assert_eq!(
        s,
        ProgressSnapshot {
            processed: 1,
            total: 2,
            errors: 1
        }
    );
    assert_eq!(agg.snapshot(), s);
}

// --- Status channel / observer ---

#[derive(Default)]
struct Recorder {
    progress: Vec<ProgressSnapshot>,
    done: Vec<(usize, usize, bool)>,
}

impl Observer for Recorder {
    fn on_progress(&mut self, snapshot: ProgressSnapshot) {
        self.progress.push(snapshot);
    }

    fn on_done(&mut self, total: usize, errors: usize, has_failures: bool) {
        self.done.push((total, errors, has_failures));
    }
}

#[test]
fn test_drain_stops_at_done() {
    let (tx, rx) = status_channel();
    let mut rec = Recorder::default();
    assert_eq!(rx.drain(&mut rec), DrainState::Pending);

    tx.progress(ProgressSnapshot {
        processed: 1,
        total: 2,
        errors: 0,
    });
    assert_eq!(rx.drain(&mut rec), DrainState::Pending);
    assert_eq!(rec.progress.len(), 1);

    tx.progress(ProgressSnapshot {
        processed: 2,
        total: 2,
        errors: 1,
    });
    let mut agg = BatchAggregate::new(2);
    agg.processed = 2;
    agg.errors = 1;
    agg.failures.push(pagesplit::FailureRecord {
        input: PathBuf::from("/in/b.pdf"),
        description: "corrupt".into(),
        fault: false,
    });
    tx.done(&agg);

    assert_eq!(rx.drain(&mut rec), DrainState::Done);
    assert_eq!(rec.progress.len(), 2);
    assert_eq!(rec.done, vec![(2, 1, true)]);
}

#[test]
fn test_done_without_progress() {
    let (tx, rx) = status_channel();
    tx.done(&BatchAggregate::new(0));
    let mut rec = Recorder::default();
    assert_eq!(
        rx.poll_until_done(&mut rec, Duration::from_millis(1)),
        DrainState::Done
    );
    assert!(rec.progress.is_empty());
    assert_eq!(rec.done, vec![(0, 0, false)]);
}

#[test]
fn test_dropped_sender_is_disconnected() {
    let (tx, rx) = status_channel();
    drop(tx);
    let mut rec = Recorder::default();
    assert_eq!(rx.drain(&mut rec), DrainState::Disconnected);
}

#[test]
fn test_sending_after_observer_gone_is_harmless() {
    let (tx, rx) = status_channel();
    drop(rx);
    tx.progress(ProgressSnapshot::default());
    tx.done(&BatchAggregate::new(0));
}

// --- Batch coordinator ---

#[test]
fn test_ten_items_two_corrupt() {
    let handle = start_batch_with(items(10), 3, failing_on(&[3, 7]));
    assert_eq!(handle.total(), 10);
    assert_eq!(handle.concurrency(), 3);
    let messages = all_messages(handle.status());
    let agg = handle.wait().unwrap();

    assert_eq!(
        messages.last(),
        Some(&StatusMessage::Done {
            total: 10,
            errors: 2,
            has_failures: true
        })
    );
    let dones = messages
        .iter()
        .filter(|m| matches!(m, StatusMessage::Done { .. }))
        .count();
    assert_eq!(dones, 1);
    assert_eq!(messages.len(), 11);

    assert_eq!(agg.failures.len(), 2);
    assert_eq!(
        failure_inputs(&agg),
        BTreeSet::from([
            PathBuf::from("/in/item3.pdf"),
            PathBuf::from("/in/item7.pdf")
        ])
    );
    assert!(agg.failures.iter().all(|f| f.description == "corrupt"));
}

#[test]
fn test_status_messages_follow_completion_order() {
    let handle = start_batch_with(items(30), 4, failing_on(&[2, 11, 29]));
    let messages = all_messages(handle.status());
    handle.wait().unwrap();

    let mut last = 0;
    let mut last_errors = 0;
    for msg in &messages[..messages.len() - 1] {
        match *msg {
            StatusMessage::Progress {
                processed,
                total,
                errors,
            } => {
                assert!(processed > last);
                assert!(errors >= last_errors);
                assert!(errors <= processed && processed <= total);
                last = processed;
                last_errors = errors;
            }
            StatusMessage::Done { .. } => panic!("Done before the end"),
        }
    }
    assert_eq!(last, 30);
    assert!(matches!(
        messages.last(),
        Some(StatusMessage::Done {
            total: 30,
            errors: 3,
            ..
        })
    ));
}

#[test]
fn test_all_failing_batch_still_completes() {
    let t = |_: &WorkItem| -> Result<Vec<PathBuf>, JobError> { Err("nope".into()) };
    let handle = start_batch_with(items(7), 2, t);
    let messages = all_messages(handle.status());
    let agg = handle.wait().unwrap();
    assert_eq!(agg.processed, 7);
    assert_eq!(agg.errors, 7);
    assert_eq!(
        messages.last(),
        Some(&StatusMessage::Done {
            total: 7,
            errors: 7,
            has_failures: true
        })
    );
}
