//! Download coordinator for concurrent, resumable batch downloads.
//!
//! The coordinator filters the requested URLs against the completion ledger,
//! runs the remaining ones through a semaphore-bounded pool of Tokio tasks and
//! records each success in the ledger as soon as it is reported.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bulkget_core::download::{DownloadCoordinator, HttpClient, RunConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = DownloadCoordinator::new(RunConfig::default())?;
//! let urls = vec!["https://example.com/a.zip".to_string()];
//! let summary = coordinator.run(&urls, Arc::new(HttpClient::new())).await?;
//! println!("Completed: {}, Failed: {}, Skipped: {}", summary.succeeded, summary.failed, summary.skipped);
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, DEFAULT_DESTINATION_DIR, LEDGER_FILE_NAME,
    READ_TIMEOUT_SECS,
};
use super::error::DownloadError;
use super::task::{DownloadResult, DownloadTask, Fetcher, TaskOutcome};
use crate::ledger::{CompletionLedger, LedgerError};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Error type for coordinator operations.
///
/// Only shared preconditions surface here; per-task failures never do.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The destination directory could not be created.
    #[error("cannot create destination directory {path}: {source}")]
    CreateDestination {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The ledger could not be loaded.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Parameters of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory that receives the files and the ledger.
    pub destination_dir: PathBuf,
    /// Maximum number of simultaneously active fetches.
    pub concurrency: usize,
    /// HTTP connect timeout.
    pub connect_timeout: Duration,
    /// HTTP read timeout (maximum silence while receiving).
    pub read_timeout: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            destination_dir: PathBuf::from(DEFAULT_DESTINATION_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

impl RunConfig {
    /// Creates a config for `destination_dir` with default everything else.
    #[must_use]
    pub fn new(destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            destination_dir: destination_dir.into(),
            ..Self::default()
        }
    }

    /// Sets the concurrency limit.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Path of the ledger inside the destination directory.
    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.destination_dir.join(LEDGER_FILE_NAME)
    }
}

/// Outcome counts of one [`DownloadCoordinator::run`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs passed in.
    pub requested: usize,
    /// URLs already in the ledger (or repeated in the input) and not dispatched.
    pub skipped: usize,
    /// URLs handed to a worker or failed during name resolution.
    pub dispatched: usize,
    /// Downloads written and recorded in the ledger.
    pub succeeded: usize,
    /// Downloads that failed in this run.
    pub failed: usize,
    /// URLs of the failed downloads, in completion order.
    pub failed_urls: Vec<String>,
}

impl RunSummary {
    fn record_failure(&mut self, url: String) {
        self.failed += 1;
        self.failed_urls.push(url);
    }

    /// Returns true if every dispatched URL succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Coordinator for concurrent file downloads with a completion ledger.
///
/// # Concurrency Model
///
/// - Each pending URL runs in its own Tokio task
/// - A task acquires a semaphore permit before fetching, so at most
///   `concurrency` fetches are active
/// - Permits are released automatically when fetches complete (RAII)
/// - Results flow back to the coordinator loop, the only ledger writer
#[derive(Debug)]
pub struct DownloadCoordinator {
    config: RunConfig,
}

impl DownloadCoordinator {
    /// Creates a coordinator for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the concurrency is
    /// outside 1-100.
    #[instrument(level = "debug")]
    pub fn new(config: RunConfig) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&config.concurrency) {
            return Err(EngineError::InvalidConcurrency {
                value: config.concurrency,
            });
        }
        Ok(Self { config })
    }

    /// Returns the run configuration.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Downloads every URL of `urls` not yet recorded in the ledger.
    ///
    /// This method:
    /// 1. Creates the destination directory if missing
    /// 2. Loads the ledger and drops already completed URLs
    /// 3. Fetches the rest with at most `concurrency` active at once
    /// 4. Appends each success to the ledger as soon as it arrives
    /// 5. Returns once every dispatched fetch has finished
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CreateDestination`] or [`EngineError::Ledger`]
    /// when the shared setup fails. Individual download failures do NOT cause
    /// this method to error; they are counted in the summary.
    #[instrument(skip(self, urls, fetcher), fields(destination = %self.config.destination_dir.display(), requested = urls.len()))]
    pub async fn run(
        &self,
        urls: &[String],
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<RunSummary, EngineError> {
        let destination_dir = self.config.destination_dir.clone();
        tokio::fs::create_dir_all(&destination_dir)
            .await
            .map_err(|source| EngineError::CreateDestination {
                path: destination_dir.clone(),
                source,
            })?;

        let mut ledger = CompletionLedger::load(self.config.ledger_path()).await?;
        let mut summary = RunSummary {
            requested: urls.len(),
            ..RunSummary::default()
        };

        let pending = pending_urls(urls, &ledger);
        summary.skipped = urls.len() - pending.len();
        summary.dispatched = pending.len();
        info!(
            pending = pending.len(),
            skipped = summary.skipped,
            recorded = ledger.len(),
            "starting downloads"
        );

        let (tasks, rejected) = build_tasks(pending);
        for result in rejected {
            record_result(&mut ledger, &mut summary, result).await;
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut workers = JoinSet::new();
        let mut in_flight: HashSet<String> = HashSet::with_capacity(tasks.len());

        for task in tasks {
            let semaphore = Arc::clone(&semaphore);
            let fetcher = Arc::clone(&fetcher);
            let destination_dir = destination_dir.clone();

            in_flight.insert(task.url().to_string());
            workers.spawn(async move {
                // The semaphore is never closed.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return DownloadResult::failed(
                        task.url(),
                        DownloadError::io(
                            destination_dir,
                            std::io::Error::other("worker pool shut down"),
                        ),
                    );
                };
                debug!(url = %task.url(), "fetch started");
                fetcher.fetch(&task, &destination_dir).await
            });
        }

        debug!(task_count = workers.len(), "waiting for downloads to complete");

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(result) => {
                    in_flight.remove(&result.url);
                    record_result(&mut ledger, &mut summary, result).await;
                }
                Err(e) => warn!(error = %e, "download task panicked"),
            }
        }

        // Whatever never reported back belongs to a panicked worker.
        for url in in_flight {
            warn!(url = %url, "download did not complete");
            summary.record_failure(url);
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            total = summary.dispatched,
            "downloads finished"
        );
        Ok(summary)
    }
}

/// URLs not yet in the ledger, in input order, each at most once.
fn pending_urls<'a>(urls: &'a [String], ledger: &CompletionLedger) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    urls.iter()
        .map(String::as_str)
        .filter(|url| !ledger.contains(url))
        .filter(|url| seen.insert(*url))
        .collect()
}

/// Resolves file names up front so that no two tasks write the same file
/// and no task overwrites the ledger.
fn build_tasks(pending: Vec<&str>) -> (Vec<DownloadTask>, Vec<DownloadResult>) {
    let mut claimed: HashMap<String, String> = HashMap::new();
    let mut tasks = Vec::with_capacity(pending.len());
    let mut rejected = Vec::new();

    for url in pending {
        match DownloadTask::new(url) {
            Ok(task) => {
                if task.file_name() == LEDGER_FILE_NAME {
                    let error = DownloadError::reserved_file_name(url, task.file_name());
                    rejected.push(DownloadResult::failed(url, error));
                } else if let Some(owner) = claimed.get(task.file_name()) {
                    let error = DownloadError::duplicate_file_name(url, task.file_name(), owner);
                    rejected.push(DownloadResult::failed(url, error));
                } else {
                    claimed.insert(task.file_name().to_string(), url.to_string());
                    tasks.push(task);
                }
            }
            Err(error) => rejected.push(DownloadResult::failed(url, error)),
        }
    }

    (tasks, rejected)
}

async fn record_result(
    ledger: &mut CompletionLedger,
    summary: &mut RunSummary,
    result: DownloadResult,
) {
    match result.outcome {
        TaskOutcome::Succeeded { path, .. } => {
            if let Err(e) = ledger.append(&result.url).await {
                warn!(
                    url = %result.url,
                    path = %display_name(&path),
                    error = %e,
                    "download succeeded but could not be recorded"
                );
                summary.record_failure(result.url);
            } else {
                summary.succeeded += 1;
            }
        }
        TaskOutcome::Failed { reason } => {
            if reason.is_name_resolution() {
                warn!(url = %result.url, error = %reason, "skipping task");
            } else {
                debug!(url = %result.url, error = %reason, "task failed");
            }
            summary.record_failure(result.url);
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
