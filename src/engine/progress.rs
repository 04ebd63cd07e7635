//! Progress bar utilities for displaying batch status

use kdam::{Animation, Bar, BarExt};

/// Configuration for creating a progress bar
pub struct ProgressBarConfig {
    pub total: usize,
    pub desc: &'static str,
    pub animation: Animation,
}

impl ProgressBarConfig {
    pub fn new(total: usize, desc: &'static str, animation: Animation) -> Self {
        Self {
            total,
            desc,
            animation,
        }
    }
}

/// Create a progress bar with the given configuration
pub fn create_progress_bar(config: ProgressBarConfig) -> Bar {
    kdam::tqdm!(
        total = config.total,
        desc = config.desc,
        animation = config.animation,
        unit = " PDFs"
    )
}

/// Update the bar's total and redraw.
pub fn set_bar_total(bar: &mut Bar, total: usize) {
    bar.total = total;
    let _ = bar.refresh();
}

/// Advance the bar by `n` and show the running error count.
pub fn advance_bar(bar: &mut Bar, n: usize, errors: usize) {
    bar.set_postfix(format!("errors={errors}"));
    let _ = bar.update(n);
}

pub fn refresh_bar(bar: &mut Bar) {
    let _ = bar.refresh();
}
