//! Error types for ledger operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or appending to the completion ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger exists but could not be read.
    #[error("failed to read ledger {path}: {source}")]
    Read {
        /// Ledger file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An entry could not be appended durably.
    #[error("failed to append to ledger {path}: {source}")]
    Write {
        /// Ledger file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Ledger entries are single lines; a URL containing a line break cannot be recorded.
    #[error("refusing to record multi-line entry in ledger {path}")]
    MultiLineEntry {
        /// Ledger file path.
        path: PathBuf,
    },
}

impl LedgerError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
