//! Error types for the download module.
//!
//! Every per-task failure is expressed as a [`DownloadError`]. The coordinator
//! never propagates these; they end up inside a failed task outcome.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading a single URL.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The provided URL is malformed or uses an unsupported scheme.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The URL does not yield a usable local file name (e.g. it ends in `/`).
    #[error("cannot derive a file name from {url}")]
    EmptyFileName {
        /// The URL whose path has no final segment.
        url: String,
    },

    /// Another URL in the same run already claimed this file name.
    #[error("file name {file_name} for {url} is already used by {claimed_by}")]
    DuplicateFileName {
        /// The URL that lost the name.
        url: String,
        /// The contested file name.
        file_name: String,
        /// The URL that claimed the name first.
        claimed_by: String,
    },

    /// The file name is reserved for the tool's own bookkeeping (the ledger).
    #[error("file name {file_name} for {url} is reserved for the completion ledger")]
    ReservedFileName {
        /// The URL that resolved to the reserved name.
        url: String,
        /// The reserved file name.
        file_name: String,
    },

    /// The server answered with something other than `200 OK`.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Network-level error (DNS resolution, connection refused, TLS, broken body stream).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Connect or read timed out.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// File system error while writing the download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an empty file name error.
    pub fn empty_file_name(url: impl Into<String>) -> Self {
        Self::EmptyFileName { url: url.into() }
    }

    /// Creates a duplicate file name error.
    pub fn duplicate_file_name(
        url: impl Into<String>,
        file_name: impl Into<String>,
        claimed_by: impl Into<String>,
    ) -> Self {
        Self::DuplicateFileName {
            url: url.into(),
            file_name: file_name.into(),
            claimed_by: claimed_by.into(),
        }
    }

    /// Creates a reserved file name error.
    pub fn reserved_file_name(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self::ReservedFileName {
            url: url.into(),
            file_name: file_name.into(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a network error from a reqwest error, mapping timeouts to [`Self::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true when the failure happened before any request was sent.
    #[must_use]
    pub fn is_name_resolution(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. }
                | Self::EmptyFileName { .. }
                | Self::DuplicateFileName { .. }
                | Self::ReservedFileName { .. }
        )
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path the source error does not carry.
