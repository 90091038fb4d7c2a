//! Input parsing for URL lists.
//!
//! Input is plain text with one URL per line. Blank lines and lines starting
//! with `#` are ignored. Every other line must be an absolute `http` or `https`
//! URL; anything else is reported in [`ParseResult::skipped`] and does not stop
//! parsing.
//!
//! Accepted URLs are kept exactly as written (after trimming), since that
//! string is also the identity recorded in the completion ledger.
//!
//! # Example
//!
//! ```
//! use bulkget_core::parser::parse_input;
//!
//! let result = parse_input("# mirrors\nhttps://example.com/a.zip\n\nftp://old/b.zip\n");
//! assert_eq!(result.items, vec!["https://example.com/a.zip".to_string()]);
//! assert_eq!(result.skipped_count(), 1);
//! ```

mod error;
mod input;

pub use error::{MAX_URL_LENGTH, ParseError};
pub use input::ParseResult;

use tracing::{debug, info};
use url::Url;

/// Parses raw text input into a list of URLs.
///
/// - Empty input returns an empty result (not an error)
/// - Each line is validated individually; invalid lines are logged and skipped
/// - Line order is preserved and duplicates are kept (the coordinator collapses them)
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
#[must_use]
pub fn parse_input(input: &str) -> ParseResult {
    let mut result = ParseResult::new();

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match validate_url(index + 1, line) {
            Ok(()) => result.items.push(line.to_string()),
            Err(e) => {
                debug!(error = %e, "skipping input line");
                result.skipped.push(e);
            }
        }
    }

    info!(
        urls = result.len(),
        skipped = result.skipped_count(),
        "Parsing complete"
    );
    result
}

/// Validation rules:
/// - Must not exceed `MAX_URL_LENGTH` (2000 chars)
/// - Must be parseable by the `url` crate
/// - Must use http or https scheme (no ftp, file, etc.)
/// - Must have a host (domain or IP)
fn validate_url(line: usize, raw: &str) -> Result<(), ParseError> {
    if raw.len() > MAX_URL_LENGTH {
        return Err(ParseError::too_long(line, raw));
    }

    let parsed = Url::parse(raw).map_err(|e| ParseError::malformed(line, raw, &e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(ParseError::unsupported_scheme(line, raw, scheme)),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ParseError::no_host(line, raw));
    }

    Ok(())
}
