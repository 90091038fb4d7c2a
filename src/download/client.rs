//! HTTP client wrapper for downloading files.
//!
//! This module provides the `HttpClient` struct which performs a single
//! streaming GET per task with bounded memory, timeouts and progress
//! reporting. It is the production [`Fetcher`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};

use super::constants::{CHUNK_SIZE, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::progress::{NoProgress, ProgressReporter, TaskProgress};
use super::task::{DownloadResult, DownloadTask, Fetcher};
use crate::user_agent;

/// HTTP client for downloading files with streaming support.
///
/// Create it once and share it between tasks; clones share the underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use bulkget_core::download::{DownloadTask, HttpClient};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let task = DownloadTask::new("https://example.com/file.zip")?;
/// let file = client.download_to_file(&task, Path::new("./downloads")).await?;
/// println!("Downloaded {} bytes to {}", file.bytes_written, file.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    progress: Arc<dyn ProgressReporter>,
}

/// A completed download.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Final output path.
    pub path: PathBuf,
    /// Bytes written to disk.
    pub bytes_written: u64,
    /// `Content-Length` announced by the server, used for progress only.
    pub content_length: Option<u64>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes between received bytes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            Duration::from_secs(READ_TIMEOUT_SECS),
        )
        .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialized.
    pub fn with_timeouts(
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()?;
        Ok(Self {
            client,
            progress: Arc::new(NoProgress),
        })
    }

    /// Replaces the progress reporter used for every download.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Downloads `task` into `destination_dir`.
    ///
    /// Only `200 OK` is accepted. The body is written in pieces of at most
    /// [`CHUNK_SIZE`] bytes and never held in memory as a whole. A partially
    /// written file is removed when streaming fails.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The request fails (network error, timeout)
    /// - The server answers with any status other than 200
    /// - Creating or writing the destination file fails
    #[instrument(skip(self, task, destination_dir), fields(url = %task.url(), file = %task.file_name()))]
    pub async fn download_to_file(
        &self,
        task: &DownloadTask,
        destination_dir: &Path,
    ) -> Result<DownloadedFile, DownloadError> {
        let url = task.url();
        debug!("starting download");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_length = content_length_header(&response);
        let file_path = task.destination_path(destination_dir);
        debug!(path = %file_path.display(), ?content_length, "resolved output path");

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let mut progress = self.progress.start(task.file_name(), content_length);
        let stream_result =
            stream_to_file(&mut file, response, url, &file_path, progress.as_mut()).await;
        drop(file);

        match stream_result {
            Ok(bytes_written) => {
                progress.finish();
                Ok(DownloadedFile {
                    path: file_path,
                    bytes_written,
                    content_length,
                })
            }
            Err(error) => {
                progress.abandon(&error.to_string());
                debug!(path = %file_path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(&file_path).await;
                Err(error)
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, task: &DownloadTask, destination_dir: &Path) -> DownloadResult {
        match self.download_to_file(task, destination_dir).await {
            Ok(file) => {
                info!(
                    file = %task.file_name(),
                    bytes = file.bytes_written,
                    "download complete"
                );
                DownloadResult::succeeded(
                    task.url(),
                    file.path,
                    file.bytes_written,
                    file.content_length,
                )
            }
            Err(error) => {
                if let DownloadError::HttpStatus { status, .. } = &error {
                    warn!(file = %task.file_name(), status, "download failed");
                } else {
                    warn!(file = %task.file_name(), error = %error, "error while downloading");
                }
                DownloadResult::failed(task.url(), error)
            }
        }
    }
}

/// Streams the response body to `file`, returning bytes written.
///
/// Incoming network chunks are re-sliced so no single write or progress step
/// exceeds [`CHUNK_SIZE`].
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    progress: &mut dyn TaskProgress,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        for piece in chunk.chunks(CHUNK_SIZE) {
            writer
                .write_all(piece)
                .await
                .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;
            let len = piece.len() as u64;
            bytes_written += len;
            progress.advance(len);
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

fn content_length_header(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}
