//! Bulkget Core Library
//!
//! This library provides the core functionality for the bulkget tool, which
//! downloads a list of URLs into a directory concurrently and remembers which
//! ones completed, so an interrupted run can simply be started again.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - File naming, streaming HTTP client and the concurrent coordinator
//! - [`ledger`] - Append-only record of completed URLs
//! - [`parser`] - URL list parsing

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod ledger;
pub mod parser;
mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use download::{
    CHUNK_SIZE, DEFAULT_CONCURRENCY, DEFAULT_DESTINATION_DIR, DownloadCoordinator, DownloadError,
    DownloadResult, DownloadTask, EngineError, Fetcher, HttpClient, LEDGER_FILE_NAME, NoProgress,
    ProgressReporter, RunConfig, RunSummary, TaskOutcome, TaskProgress, file_name_from_url,
};
pub use ledger::{CompletionLedger, LedgerError};
pub use parser::{ParseResult, parse_input};
