//! Result type of [`super::parse_input`].

use std::fmt;

use super::error::ParseError;

/// URLs accepted from the input, plus the lines that were rejected.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// Accepted URLs, verbatim (trimmed) and in input order
    pub items: Vec<String>,
    /// Rejected lines (for logging)
    pub skipped: Vec<ParseError>,
}

impl ParseResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no URL was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns count of accepted URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns count of rejected lines.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Consumes the result, returning the accepted URLs.
    #[must_use]
    pub fn into_urls(self) -> Vec<String> {
        self.items
    }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsed {} URLs ({} skipped)",
            self.items.len(),
            self.skipped.len()
        )
    }
}
