//! Local file name derivation for downloads.
//!
//! A file is named after the final segment of its URL path, without any
//! query string, percent-decoded and stripped of characters that are unsafe
//! on common filesystems.

use std::path::{Component, Path};

use url::Url;

use super::error::DownloadError;

/// Derives the local file name for `url`.
///
/// `https://host/path/name.ext?token=abc` and `https://host/path/name.ext`
/// both resolve to `name.ext`.
///
/// # Errors
///
/// - [`DownloadError::InvalidUrl`] if `url` does not parse or is not HTTP(S)
/// - [`DownloadError::EmptyFileName`] if the path has no final segment
///   (for example `https://host/dir/`)
pub fn file_name_from_url(url: &str) -> Result<String, DownloadError> {
    let parsed = parse_http_url(url)?;

    let last_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let without_query = strip_query(last_segment);
    if without_query.is_empty() {
        return Err(DownloadError::empty_file_name(url));
    }

    let decoded = urlencoding::decode(without_query)
        .map_or_else(|_| without_query.to_string(), std::borrow::Cow::into_owned);
    let name = sanitize_filename(&decoded);
    if name.trim_matches('_').is_empty() {
        return Err(DownloadError::empty_file_name(url));
    }
    Ok(name)
}

/// Parses `url`, accepting only `http` and `https`.
pub(crate) fn parse_http_url(url: &str) -> Result<Url, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(DownloadError::invalid_url(url)),
    }
}

/// Drops everything from the first `?` onward.
fn strip_query(segment: &str) -> &str {
    segment.split('?').next().unwrap_or_default()
}

/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
