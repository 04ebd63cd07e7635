//! Terminal observer: renders batch status on the main thread.

use kdam::{Animation, Bar};
use log::info;

use crate::ProgressSnapshot;
use crate::engine::progress::{
    ProgressBarConfig, advance_bar, create_progress_bar, refresh_bar, set_bar_total,
};
use crate::pipeline::Observer;
use crate::utils::Colors;

/// Final counts as seen by the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoneSummary {
    pub total: usize,
    pub errors: usize,
    pub has_failures: bool,
}

/// Drives a kdam bar from status messages. With `show_bar == false` it only tracks counts.
pub struct TerminalObserver {
    bar: Option<Bar>,
    shown: usize,
    last: ProgressSnapshot,
    done: Option<DoneSummary>,
}

impl TerminalObserver {
    pub fn new(total: usize, show_bar: bool) -> Self {
        let bar = show_bar.then(|| {
            let mut b = create_progress_bar(ProgressBarConfig::new(
                total,
                "Splitting",
                Animation::Classic,
            ));
            refresh_bar(&mut b);
            b
        });
        Self {
            bar,
            shown: 0,
            last: ProgressSnapshot {
                total,
                ..ProgressSnapshot::default()
            },
            done: None,
        }
    }

    /// Latest counts received.
    pub fn last(&self) -> ProgressSnapshot {
        self.last
    }

    pub fn done(&self) -> Option<DoneSummary> {
        self.done
    }

    fn catch_up(&mut self, processed: usize, errors: usize) {
        if processed <= self.shown {
            return;
        }
        if let Some(bar) = self.bar.as_mut() {
            advance_bar(bar, processed - self.shown, errors);
        }
        self.shown = processed;
    }
}

impl Observer for TerminalObserver {
    fn on_progress(&mut self, snapshot: ProgressSnapshot) {
        self.last = snapshot;
        self.catch_up(snapshot.processed, snapshot.errors);
    }

    fn on_done(&mut self, total: usize, errors: usize, has_failures: bool) {
        self.last = ProgressSnapshot {
            processed: total,
            total,
            errors,
        };
        if let Some(bar) = self.bar.as_mut() {
            set_bar_total(bar, total);
        }
        self.catch_up(total, errors);
        if self.bar.is_some() {
            eprintln!();
        }
        self.done = Some(DoneSummary {
            total,
            errors,
            has_failures,
        });
    }
}

/// Log the end-of-batch summary line.
pub fn print_summary(summary: &DoneSummary) {
    let errors = format!("Errors: {}", summary.errors);
    let errors = if summary.errors > 0 {
        Colors::colorize(Colors::ERROR, &errors)
    } else {
        Colors::colorize(Colors::OK, &errors)
    };
    info!("{} PDFs processed. {}", summary.total, errors);
}
