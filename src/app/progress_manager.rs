//! Progress bars for download runs.

use std::sync::Arc;
use std::time::Duration;

use bulkget_core::{ProgressReporter, TaskProgress};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{msg:30!} [{bar:30.cyan/blue}] {bytes:>10}/{total_bytes:<10} {bytes_per_sec:>12} {eta}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg:30!} {bytes:>10} {bytes_per_sec:>12}";

/// One bar per active download, stacked on stderr.
#[derive(Debug, Clone)]
pub(crate) struct IndicatifProgress {
    multi: MultiProgress,
}

impl IndicatifProgress {
    pub(crate) fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
        }
    }
}

/// Returns the reporter for a run: bars when `enabled`, otherwise `None` so
/// the client keeps its silent default.
pub(crate) fn progress_reporter(enabled: bool) -> Option<Arc<dyn ProgressReporter>> {
    enabled.then(|| Arc::new(IndicatifProgress::new()) as Arc<dyn ProgressReporter>)
}

impl IndicatifProgress {
    /// Adds a bar for `file_name`: sized when `total` is known, a spinner otherwise.
    fn task_bar(&self, file_name: &str, total: Option<u64>) -> ProgressBar {
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(BAR_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template(SPINNER_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        let bar = self.multi.add(bar);
        bar.set_message(file_name.to_string());
        bar
    }
}

impl ProgressReporter for IndicatifProgress {
    fn start(&self, file_name: &str, total: Option<u64>) -> Box<dyn TaskProgress> {
        Box::new(BarProgress {
            bar: self.task_bar(file_name, total),
        })
    }
}

struct BarProgress {
    bar: ProgressBar,
}

impl TaskProgress for BarProgress {
    fn advance(&mut self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }

    fn abandon(&mut self, reason: &str) {
        self.bar.abandon_with_message(format!("{} failed: {reason}", self.bar.message()));
    }
}
