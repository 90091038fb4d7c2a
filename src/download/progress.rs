//! Pluggable per-task progress reporting.
//!
//! The fetcher reports progress through these traits only; rendering is up to
//! the caller. [`NoProgress`] discards everything and is the library default.

use std::fmt::Debug;

/// Creates a progress handle for each task as its response starts streaming.
pub trait ProgressReporter: Debug + Send + Sync {
    /// Begins progress for `file_name`. `total` is `None` when the server did
    /// not send `Content-Length`, which means indeterminate, not zero.
    fn start(&self, file_name: &str, total: Option<u64>) -> Box<dyn TaskProgress>;
}

/// Progress handle for a single streaming download.
pub trait TaskProgress: Send {
    /// Advances the transferred byte count.
    fn advance(&mut self, bytes: u64);

    /// Marks the transfer as finished successfully.
    fn finish(&mut self);

    /// Marks the transfer as failed.
    fn abandon(&mut self, reason: &str);
}

/// Reporter that ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _file_name: &str, _total: Option<u64>) -> Box<dyn TaskProgress> {
        Box::new(NoProgress)
    }
}

impl TaskProgress for NoProgress {
    fn advance(&mut self, _bytes: u64) {}

    fn finish(&mut self) {}

    fn abandon(&mut self, _reason: &str) {}
}
