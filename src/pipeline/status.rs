//! Status delivery from the batch to an observer on another thread.
//!
//! The batch side holds a [`StatusSender`]; the observer side polls a [`StatusReceiver`] on its
//! own schedule. Messages are immutable copies of counts; the observer never sees the
//! aggregator or any work item.

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use std::thread;
use std::time::Duration;

use crate::{BatchAggregate, ProgressSnapshot, StatusMessage};

/// Receives status messages, in arrival order.
pub trait Observer {
    fn on_progress(&mut self, snapshot: ProgressSnapshot);

    /// Final state. Authoritative regardless of how many progress messages came before.
    fn on_done(&mut self, total: usize, errors: usize, has_failures: bool);
}

/// Where a [`StatusReceiver::drain`] left off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainState {
    /// Queue empty, batch still running.
    Pending,
    /// `Done` was received.
    Done,
    /// The batch side went away without sending `Done`.
    Disconnected,
}

/// Create a connected sender/receiver pair. The buffer is unbounded, so sending never waits
/// on the observer.
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    let (tx, rx) = unbounded::<StatusMessage>();
    (StatusSender { tx }, StatusReceiver { rx })
}

/// Batch side of the channel.
pub struct StatusSender {
    tx: Sender<StatusMessage>,
}

impl StatusSender {
    /// Send a `Progress` message. An observer that hung up does not affect the batch.
    pub fn progress(&self, snapshot: ProgressSnapshot) {
        let _ = self.tx.send(snapshot.into());
    }

    /// Send the terminal `Done` message. Consumes the sender: nothing can follow it.
    pub fn done(self, aggregate: &BatchAggregate) {
        let _ = self.tx.send(StatusMessage::Done {
            total: aggregate.total,
            errors: aggregate.errors,
            has_failures: aggregate.has_failures(),
        });
    }
}

/// Observer side of the channel.
pub struct StatusReceiver {
    rx: Receiver<StatusMessage>,
}

impl StatusReceiver {
    /// Non-blocking: next queued message, if any.
    pub fn try_next(&self) -> Option<StatusMessage> {
        self.rx.try_recv().ok()
    }

    /// Blocking: next message, or None once the batch side is gone and the queue is empty.
    pub fn next_blocking(&self) -> Option<StatusMessage> {
        self.rx.recv().ok()
    }

    /// Hand every message queued right now to `observer`, without blocking. Stops at `Done`.
    pub fn drain<O: Observer + ?Sized>(&self, observer: &mut O) -> DrainState {
        loop {
            match self.rx.try_recv() {
                Ok(StatusMessage::Progress {
                    processed,
                    total,
                    errors,
                }) => observer.on_progress(ProgressSnapshot {
                    processed,
                    total,
                    errors,
                }),
                Ok(StatusMessage::Done {
                    total,
                    errors,
                    has_failures,
                }) => {
                    observer.on_done(total, errors, has_failures);
                    return DrainState::Done;
                }
                Err(TryRecvError::Empty) => return DrainState::Pending,
                Err(TryRecvError::Disconnected) => return DrainState::Disconnected,
            }
        }
    }

    /// Drain every `tick` until `Done` (or disconnect).
    pub fn poll_until_done<O: Observer + ?Sized>(
        &self,
        observer: &mut O,
        tick: Duration,
    ) -> DrainState {
        loop {
            match self.drain(observer) {
                DrainState::Pending => thread::sleep(tick),
                state => return state,
            }
        }
    }
}
