//! CLI entry point for the bulkget tool.

use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use bulkget_core::{DownloadCoordinator, EngineError, HttpClient, RunSummary, parse_input};
use tracing::{debug, info, warn};

mod app;
mod app_config;
mod cli;

use app::config_runtime::{
    apply_config_defaults, parse_cli_with_sources, resolve_default_log_level, run_config,
    should_force_cli_log_level,
};
use app::progress_manager::progress_reporter;
use app::terminal::{
    init_tracing, is_dumb_terminal, no_color_env_requested, should_disable_color,
    should_use_progress,
};
use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let (args, cli_sources) = parse_cli_with_sources();

    let loaded = app_config::load_default_file_config()?;
    let args = apply_config_defaults(args, &cli_sources, loaded.config.as_ref())?;

    let dumb_terminal = is_dumb_terminal();
    init_tracing(
        resolve_default_log_level(&args),
        should_force_cli_log_level(&cli_sources),
        should_disable_color(no_color_env_requested(), dumb_terminal),
    );

    debug!(?args, config_path = ?loaded.path, "CLI arguments resolved");

    let Some(input_text) = read_input(&args)? else {
        info!("No input provided. Pass URLs as arguments, use --input FILE, or pipe them via stdin.");
        info!("Example: echo 'https://example.com/file.zip' | bulkget -o downloads");
        return Ok(());
    };

    let parse_result = parse_input(&input_text);
    for skipped in &parse_result.skipped {
        warn!("Skipped input: {skipped}");
    }
    if parse_result.is_empty() {
        info!("No valid URLs found in input");
        return Ok(());
    }
    let urls = parse_result.into_urls();

    let config = run_config(&args);
    let mut client = HttpClient::with_timeouts(config.connect_timeout, config.read_timeout)
        .context("Failed to build HTTP client")?;
    let use_progress = should_use_progress(
        io::stderr().is_terminal(),
        args.quiet,
        args.no_progress,
        dumb_terminal,
    );
    if let Some(reporter) = progress_reporter(use_progress) {
        client = client.with_progress(reporter);
    }

    let destination = config.destination_dir.clone();
    let started = Instant::now();
    let coordinator = DownloadCoordinator::new(config)?;
    let summary = coordinator
        .run(&urls, Arc::new(client))
        .await
        .map_err(|error| {
            let context = run_error_context(&error, &destination);
            anyhow::Error::new(error).context(context)
        })?;

    report_summary(&summary, &destination, started, args.quiet);
    Ok(())
}

/// Names the precondition a run stopped on.
fn run_error_context(error: &EngineError, destination: &Path) -> String {
    match error {
        EngineError::CreateDestination { .. } => {
            format!("Cannot prepare output directory '{}'", destination.display())
        }
        EngineError::Ledger(_) => {
            format!("Cannot use the completion ledger in '{}'", destination.display())
        }
        EngineError::InvalidConcurrency { .. } => "Invalid run configuration".to_string(),
    }
}

/// Input priority: positional URLs, then `--input FILE`, then piped stdin.
fn read_input(args: &Args) -> Result<Option<String>> {
    if !args.urls.is_empty() {
        return Ok(Some(args.urls.join("\n")));
    }
    if let Some(path) = &args.input {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
        return Ok(Some(text));
    }
    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(Some(buffer));
    }
    Ok(None)
}

fn report_summary(summary: &RunSummary, destination: &Path, started: Instant, quiet: bool) {
    if !summary.all_succeeded() {
        for url in &summary.failed_urls {
            warn!(url = %url, "Not downloaded; it will be retried on the next run");
        }
    }
    info!(
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        destination = %destination.display(),
        "Run finished"
    );
    if !quiet {
        println!(
            "Completed: {}, Failed: {}, Skipped: {} (already downloaded)",
            summary.succeeded, summary.failed, summary.skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use bulkget_core::LedgerError;

    use super::*;

    #[test]
    fn test_run_error_context_names_the_failing_precondition() {
        let destination = PathBuf::from("out");
        let create = EngineError::CreateDestination {
            path: destination.clone(),
            source: io::Error::other("occupied"),
        };
        let ledger = EngineError::Ledger(LedgerError::Read {
            path: destination.join("download_log.txt"),
            source: io::Error::other("is a directory"),
        });

        assert_eq!(
            run_error_context(&create, &destination),
            "Cannot prepare output directory 'out'"
        );
        assert_eq!(
            run_error_context(&ledger, &destination),
            "Cannot use the completion ledger in 'out'"
        );
    }
}
