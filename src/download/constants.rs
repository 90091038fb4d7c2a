//! Constants for the download module (timeouts, chunking, on-disk layout).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes without a byte arriving).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Size of the pieces a response body is written and reported in.
pub const CHUNK_SIZE: usize = 8192;

/// Default number of simultaneously active fetches.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Default destination folder, relative to the working directory.
pub const DEFAULT_DESTINATION_DIR: &str = "downloaded_files";

/// Name of the completion ledger inside the destination folder.
pub const LEDGER_FILE_NAME: &str = "download_log.txt";
