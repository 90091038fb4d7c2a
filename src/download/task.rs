//! Task and result types exchanged between the coordinator and fetchers.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::DownloadError;
use super::filename::file_name_from_url;

/// One URL's download, with its local file name already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    url: String,
    file_name: String,
}

impl DownloadTask {
    /// Builds a task for `url`, resolving its local file name.
    ///
    /// # Errors
    ///
    /// Returns the name-resolution errors of [`file_name_from_url`].
    pub fn new(url: impl Into<String>) -> Result<Self, DownloadError> {
        let url = url.into();
        let file_name = file_name_from_url(&url)?;
        Ok(Self { url, file_name })
    }

    /// The URL exactly as it was supplied (and as it is recorded in the ledger).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The local file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full destination path inside `destination_dir`.
    #[must_use]
    pub fn destination_path(&self, destination_dir: &Path) -> PathBuf {
        destination_dir.join(&self.file_name)
    }
}

impl fmt::Display for DownloadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.url, self.file_name)
    }
}

/// Terminal state of a task for the current run.
#[derive(Debug)]
pub enum TaskOutcome {
    /// The body was fully written, flushed and closed.
    Succeeded {
        /// Where the file was written.
        path: PathBuf,
        /// Bytes written to disk.
        bytes_written: u64,
        /// `Content-Length` as announced by the server, if any.
        content_length: Option<u64>,
    },
    /// The task failed; it will be pending again on the next run.
    Failed {
        /// Why it failed.
        reason: DownloadError,
    },
}

/// Result of one fetch, consumed by the coordinator.
#[derive(Debug)]
pub struct DownloadResult {
    /// The URL of the task.
    pub url: String,
    /// What happened.
    pub outcome: TaskOutcome,
}

impl DownloadResult {
    /// Creates a successful result.
    #[must_use]
    pub fn succeeded(
        url: impl Into<String>,
        path: PathBuf,
        bytes_written: u64,
        content_length: Option<u64>,
    ) -> Self {
        Self {
            url: url.into(),
            outcome: TaskOutcome::Succeeded {
                path,
                bytes_written,
                content_length,
            },
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failed(url: impl Into<String>, reason: DownloadError) -> Self {
        Self {
            url: url.into(),
            outcome: TaskOutcome::Failed { reason },
        }
    }

    /// Returns true if the task succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Succeeded { .. })
    }
}

/// Performs the download of a single task.
///
/// Implementations must never panic or propagate per-task failures: every
/// problem is reported through [`TaskOutcome::Failed`]. When a result reports
/// success, the file must already be flushed and closed.
///
/// This trait uses `async_trait` so the coordinator can hold an
/// `Arc<dyn Fetcher>`; Rust 2024 native async traits are not object-safe.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Downloads `task` into `destination_dir`.
    async fn fetch(&self, task: &DownloadTask, destination_dir: &Path) -> DownloadResult;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_task_resolves_file_name() {
        let task = DownloadTask::new("https://host/a/b/report.pdf?sig=1").unwrap();
        assert_eq!(task.url(), "https://host/a/b/report.pdf?sig=1");
        assert_eq!(task.file_name(), "report.pdf");
        assert_eq!(
            task.destination_path(Path::new("out")),
            Path::new("out").join("report.pdf")
        );
    }

    #[test]
    fn test_download_task_rejects_directory_url() {
        let result = DownloadTask::new("https://host/a/b/");
        assert!(matches!(result, Err(DownloadError::EmptyFileName { .. })));
    }

    #[test]
    fn test_download_result_success_flag() {
        let ok = DownloadResult::succeeded("https://h/a", PathBuf::from("a"), 3, Some(3));
        let failed = DownloadResult::failed("https://h/b", DownloadError::http_status("u", 404));
        assert!(ok.is_success());
        assert!(!failed.is_success());
    }

    #[test]
    fn test_download_task_display() {
        let task = DownloadTask::new("https://host/x.zip").unwrap();
        assert_eq!(task.to_string(), "https://host/x.zip -> x.zip");
    }
}
