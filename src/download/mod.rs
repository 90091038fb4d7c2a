//! Concurrent HTTP downloads streamed to disk.
//!
//! This module provides the pieces of a batch run:
//!
//! - [`file_name_from_url`] derives the local file name of a URL
//! - [`HttpClient`] streams one response body to a file
//! - [`DownloadCoordinator`] runs many downloads with bounded concurrency and
//!   records completions in the [`crate::ledger`]
//!
//! # Features
//!
//! - Streaming downloads in fixed-size chunks (memory-efficient for large files)
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Structured error types with full context
//! - Pluggable progress reporting
//!
//! # Example
//!
//! ```no_run
//! use bulkget_core::download::{DownloadTask, HttpClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let task = DownloadTask::new("https://example.com/paper.pdf")?;
//! let file = client.download_to_file(&task, Path::new("./downloads")).await?;
//! println!("Downloaded: {}", file.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod filename;
mod progress;
mod task;

pub use client::{DownloadedFile, HttpClient};
pub use constants::{
    CHUNK_SIZE, CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, DEFAULT_DESTINATION_DIR,
    LEDGER_FILE_NAME, READ_TIMEOUT_SECS,
};
pub use engine::{DownloadCoordinator, EngineError, RunConfig, RunSummary};
pub use error::DownloadError;
pub use filename::file_name_from_url;
pub use progress::{NoProgress, ProgressReporter, TaskProgress};
pub use task::{DownloadResult, DownloadTask, Fetcher, TaskOutcome};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
