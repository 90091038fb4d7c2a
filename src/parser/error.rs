//! Error types for input parsing operations.

use thiserror::Error;

/// Maximum URL length to accept (standard browser limit).
pub const MAX_URL_LENGTH: usize = 2000;

/// Why an input line was not accepted as a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// URL is malformed or uses an unsupported scheme
    #[error("line {line}: invalid URL '{url}': {reason}\n  Suggestion: {suggestion}")]
    InvalidUrl {
        /// 1-based line number in the input
        line: usize,
        /// The text that failed validation
        url: String,
        /// Why the URL is invalid
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// URL exceeds maximum allowed length
    #[error("line {line}: URL too long ({length} chars, max {max}): {url_preview}...")]
    UrlTooLong {
        /// 1-based line number in the input
        line: usize,
        /// Truncated URL for display
        url_preview: String,
        /// Actual length
        length: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl ParseError {
    /// Creates an `InvalidUrl` error for a non-web URL scheme.
    #[must_use]
    pub fn unsupported_scheme(line: usize, url: &str, scheme: &str) -> Self {
        Self::InvalidUrl {
            line,
            url: url.to_string(),
            reason: format!("scheme '{scheme}' is not supported"),
            suggestion: "Use http:// or https:// URLs".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a malformed URL.
    #[must_use]
    pub fn malformed(line: usize, url: &str, parse_error: &str) -> Self {
        Self::InvalidUrl {
            line,
            url: url.to_string(),
            reason: parse_error.to_string(),
            suggestion: "Put one absolute URL per line".to_string(),
        }
    }

    /// Creates an `InvalidUrl` error for a URL without a host.
    #[must_use]
    pub fn no_host(line: usize, url: &str) -> Self {
        Self::InvalidUrl {
            line,
            url: url.to_string(),
            reason: "URL has no host".to_string(),
            suggestion: "Ensure the URL includes a domain (e.g., example.com)".to_string(),
        }
    }

    /// Creates a `UrlTooLong` error for URLs exceeding the maximum length.
    #[must_use]
    pub fn too_long(line: usize, url: &str) -> Self {
        Self::UrlTooLong {
            line,
            url_preview: url.chars().take(50).collect(),
            length: url.len(),
            max: MAX_URL_LENGTH,
        }
    }

    /// Line number the error refers to.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidUrl { line, .. } | Self::UrlTooLong { line, .. } => *line,
        }
    }
}
