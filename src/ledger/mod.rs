//! Durable completion ledger.
//!
//! The ledger is a plain text file with one successfully downloaded URL per
//! line. It is loaded once at the start of a run and appended to, with a
//! flush and `fdatasync`, each time a download completes. A crash therefore
//! loses at most the downloads that had not been recorded yet, and those are
//! simply fetched again on the next run.
//!
//! # Example
//!
//! ```no_run
//! use bulkget_core::ledger::CompletionLedger;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ledger = CompletionLedger::load("downloaded_files/download_log.txt").await?;
//! if !ledger.contains("https://example.com/a.zip") {
//!     ledger.append("https://example.com/a.zip").await?;
//! }
//! # Ok(())
//! # }
//! ```

mod error;

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

pub use error::LedgerError;

/// In-memory view of the ledger plus the path of its backing file.
#[derive(Debug)]
pub struct CompletionLedger {
    path: PathBuf,
    entries: HashSet<String>,
    /// The file ends in a torn line (crash mid-append); the next append must
    /// start on a fresh line.
    needs_separator: bool,
}

impl CompletionLedger {
    /// Loads the ledger at `path`.
    ///
    /// A missing file is the normal first-run state and yields an empty
    /// ledger. Blank lines are ignored and surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Read`] if the file exists but cannot be read.
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let raw = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no ledger yet, starting empty");
                return Ok(Self {
                    path,
                    entries: HashSet::new(),
                    needs_separator: false,
                });
            }
            Err(e) => return Err(LedgerError::read(path, e)),
        };

        let needs_separator = raw.last().is_some_and(|b| *b != b'\n');
        let text = String::from_utf8_lossy(&raw);
        let entries: HashSet<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect();
        debug!(entries = entries.len(), "ledger loaded");

        Ok(Self {
            path,
            entries,
            needs_separator,
        })
    }

    /// Returns true if `url` has been recorded as completed.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url)
    }

    /// Number of distinct completed URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records `url` as completed: appends it to the file durably, then to the
    /// in-memory set. Recording a URL twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Write`] if the line cannot be written and synced,
    /// or [`LedgerError::MultiLineEntry`] if `url` contains a line break.
    pub async fn append(&mut self, url: &str) -> Result<(), LedgerError> {
        if self.needs_separator {
            write_line(&self.path, "\n", url).await?;
            self.needs_separator = false;
        } else {
            append_entry(&self.path, url).await?;
        }
        self.entries.insert(url.to_string());
        Ok(())
    }
}

/// Appends `url` followed by a newline to the ledger file at `path`, creating
/// it if needed, and syncs the data before returning.
///
/// Each call writes one independent line in a single append, so calls for
/// distinct URLs never corrupt each other's entries.
///
/// # Errors
///
/// Same as [`CompletionLedger::append`].
pub async fn append_entry(path: &Path, url: &str) -> Result<(), LedgerError> {
    write_line(path, "", url).await
}

async fn write_line(path: &Path, prefix: &str, url: &str) -> Result<(), LedgerError> {
    if url.contains(['\n', '\r']) {
        return Err(LedgerError::MultiLineEntry {
            path: path.to_path_buf(),
        });
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| LedgerError::write(path, e))?;

    let line = format!("{prefix}{url}\n");
    file.write_all(line.as_bytes())
        .await
        .map_err(|e| LedgerError::write(path, e))?;
    file.flush().await.map_err(|e| LedgerError::write(path, e))?;
    file.sync_data()
        .await
        .map_err(|e| LedgerError::write(path, e))?;

    debug!(url = %url, "ledger entry recorded");
    Ok(())
}
