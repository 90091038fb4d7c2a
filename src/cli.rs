//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use bulkget_core::{DEFAULT_CONCURRENCY, download::CONNECT_TIMEOUT_SECS, download::READ_TIMEOUT_SECS};

/// Download a list of URLs concurrently, skipping the ones already fetched.
///
/// Each URL is saved under its last path segment in the output directory.
/// Completed URLs are recorded in `download_log.txt` there, so re-running the
/// same command after an interruption only fetches what is still missing.
#[derive(Parser, Debug)]
#[command(name = "bulkget")]
#[command(author, version, about)]
pub struct Args {
    /// URLs to download (otherwise read from --input or stdin)
    pub urls: Vec<String>,

    /// Read URLs from a file, one per line (`#` starts a comment)
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory to save files and the completion log [default: downloaded_files]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Seconds to wait for a connection (1-3600)
    #[arg(long, value_name = "SECS", default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// Seconds a transfer may stall before it fails (1-3600)
    #[arg(long, value_name = "SECS", default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub read_timeout: u64,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["bulkget"]).unwrap();
        assert!(args.urls.is_empty());
        assert!(args.input.is_none());
        assert!(args.output_dir.is_none());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.no_progress);
        assert_eq!(args.concurrency, 3);
        assert_eq!(args.connect_timeout, 30);
        assert_eq!(args.read_timeout, 300);
    }

    #[test]
    fn test_cli_positional_urls() {
        let args =
            Args::try_parse_from(["bulkget", "https://a.example/1", "https://b.example/2"]).unwrap();
        assert_eq!(args.urls.len(), 2);
        assert_eq!(args.urls[1], "https://b.example/2");
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["bulkget", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["bulkget", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["bulkget", "-q", "-v"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_cli_input_and_output_flags() {
        let args =
            Args::try_parse_from(["bulkget", "-i", "urls.txt", "--output-dir", "out"]).unwrap();
        assert_eq!(args.input, Some(PathBuf::from("urls.txt")));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_cli_concurrency_range() {
        assert_eq!(Args::try_parse_from(["bulkget", "-c", "1"]).unwrap().concurrency, 1);
        assert_eq!(
            Args::try_parse_from(["bulkget", "--concurrency", "100"])
                .unwrap()
                .concurrency,
            100
        );
        for value in ["0", "101", "abc"] {
            let err = Args::try_parse_from(["bulkget", "-c", value]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
    }

    #[test]
    fn test_cli_timeout_range() {
        let args = Args::try_parse_from(["bulkget", "--connect-timeout", "5", "--read-timeout", "60"])
            .unwrap();
        assert_eq!(args.connect_timeout, 5);
        assert_eq!(args.read_timeout, 60);

        let err = Args::try_parse_from(["bulkget", "--read-timeout", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["bulkget", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["bulkget", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
