//! Merges command-line arguments with file configuration.
//!
//! Precedence: command line, then config file, then built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};

use bulkget_core::{DEFAULT_DESTINATION_DIR, RunConfig};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::Args;

/// Which options were given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) output_dir: bool,
    pub(crate) concurrency: bool,
    pub(crate) connect_timeout: bool,
    pub(crate) read_timeout: bool,
    pub(crate) no_progress: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = sources_from_matches(&matches);
    (args, sources)
}

fn sources_from_matches(matches: &ArgMatches) -> CliValueSources {
    CliValueSources {
        output_dir: is_commandline_value(matches, "output_dir"),
        concurrency: is_commandline_value(matches, "concurrency"),
        connect_timeout: is_commandline_value(matches, "connect_timeout"),
        read_timeout: is_commandline_value(matches, "read_timeout"),
        no_progress: is_commandline_value(matches, "no_progress"),
        verbose: is_commandline_value(matches, "verbose"),
        quiet: is_commandline_value(matches, "quiet"),
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Fills in every option not given on the command line from `file_config`.
pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<Args> {
    if let Some(file_config) = file_config {
        if !cli_sources.output_dir
            && let Some(output_dir) = &file_config.output_dir
        {
            args.output_dir = Some(output_dir.clone());
        }

        if !cli_sources.concurrency
            && let Some(concurrency) = file_config.concurrency
        {
            args.concurrency = concurrency;
        }

        if !cli_sources.connect_timeout
            && let Some(secs) = file_config.connect_timeout_secs
        {
            args.connect_timeout = secs;
        }

        if !cli_sources.read_timeout
            && let Some(secs) = file_config.read_timeout_secs
        {
            args.read_timeout = secs;
        }

        if !cli_sources.no_progress
            && let Some(progress) = file_config.progress
        {
            args.no_progress = !progress;
        }

        if !cli_sources.verbose
            && !cli_sources.quiet
            && let Some(verbosity) = file_config.verbosity
        {
            apply_config_verbosity(&mut args, verbosity);
        }
    }

    if !(1..=100).contains(&args.concurrency) {
        bail!(
            "Invalid effective concurrency value: {}. Expected range: 1..=100",
            args.concurrency
        );
    }

    Ok(args)
}

fn apply_config_verbosity(args: &mut Args, verbosity: VerbositySetting) {
    let (verbose, quiet) = match verbosity {
        VerbositySetting::Default => (0, false),
        VerbositySetting::Verbose => (1, false),
        VerbositySetting::Quiet => (0, true),
        VerbositySetting::Debug => (2, false),
    };
    args.verbose = verbose;
    args.quiet = quiet;
}

/// Builds the coordinator configuration from the effective arguments.
pub(crate) fn run_config(args: &Args) -> RunConfig {
    RunConfig {
        destination_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION_DIR)),
        concurrency: usize::from(args.concurrency),
        connect_timeout: Duration::from_secs(args.connect_timeout),
        read_timeout: Duration::from_secs(args.read_timeout),
    }
}

pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> (Args, CliValueSources) {
        let matches = Args::command().try_get_matches_from(argv).unwrap();
        let args = Args::from_arg_matches(&matches).unwrap();
        (args, sources_from_matches(&matches))
    }

    fn file_config() -> FileConfig {
        FileConfig {
            output_dir: Some(PathBuf::from("from-file")),
            concurrency: Some(9),
            connect_timeout_secs: Some(11),
            read_timeout_secs: Some(22),
            verbosity: Some(VerbositySetting::Quiet),
            progress: Some(false),
        }
    }

    #[test]
    fn test_sources_only_mark_explicit_flags() {
        let (_, sources) = parse(&["bulkget", "-c", "4"]);
        assert!(sources.concurrency);
        assert!(!sources.output_dir);
        assert!(!sources.read_timeout);
        assert!(!sources.verbose);
    }

    #[test]
    fn test_file_values_fill_unset_options() {
        let (args, sources) = parse(&["bulkget"]);
        let args = apply_config_defaults(args, &sources, Some(&file_config())).unwrap();

        assert_eq!(args.output_dir, Some(PathBuf::from("from-file")));
        assert_eq!(args.concurrency, 9);
        assert_eq!(args.connect_timeout, 11);
        assert_eq!(args.read_timeout, 22);
        assert!(args.quiet);
        assert!(args.no_progress);
    }

    #[test]
    fn test_command_line_beats_file() {
        let (args, sources) = parse(&["bulkget", "-o", "cli-dir", "-c", "2", "--read-timeout", "5", "-v"]);
        let args = apply_config_defaults(args, &sources, Some(&file_config())).unwrap();

        assert_eq!(args.output_dir, Some(PathBuf::from("cli-dir")));
        assert_eq!(args.concurrency, 2);
        assert_eq!(args.read_timeout, 5);
        assert_eq!(args.connect_timeout, 11);
        assert_eq!(args.verbose, 1);
        assert!(!args.quiet);
    }

    #[test]
    fn test_no_file_keeps_builtin_defaults() {
        let (args, sources) = parse(&["bulkget"]);
        let args = apply_config_defaults(args, &sources, None).unwrap();
        let config = run_config(&args);

        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_config_debug_verbosity_maps_to_trace() {
        let (args, sources) = parse(&["bulkget"]);
        let cfg = FileConfig {
            verbosity: Some(VerbositySetting::Debug),
            ..FileConfig::default()
        };
        let args = apply_config_defaults(args, &sources, Some(&cfg)).unwrap();
        assert_eq!(resolve_default_log_level(&args), "trace");
    }

    #[test]
    fn test_log_level_resolution() {
        let (args, _) = parse(&["bulkget"]);
        assert_eq!(resolve_default_log_level(&args), "info");
        let (args, sources) = parse(&["bulkget", "-q"]);
        assert_eq!(resolve_default_log_level(&args), "error");
        assert!(should_force_cli_log_level(&sources));
        let (args, sources) = parse(&["bulkget", "-v"]);
        assert_eq!(resolve_default_log_level(&args), "debug");
        assert!(should_force_cli_log_level(&sources));
    }
}
