//! URL helpers used by the path-aware rule types
//!
//! The string helpers here are mirrored line for line by the emitted PAC
//! script, so they work on the raw text and never normalize through a URL
//! parser.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref SCHEME_PREFIX: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap();
}

/// Strips `scheme://` from a URL.
///
/// Returns `None` when the URL does not start with a scheme.
///
/// # Examples
/// ```
/// use smartpac::utils::url::remove_schema_from_url;
///
/// assert_eq!(remove_schema_from_url("https://example.com/api"), Some("example.com/api"));
/// assert_eq!(remove_schema_from_url("not a url"), None);
/// ```
pub fn remove_schema_from_url(url: &str) -> Option<&str> {
    SCHEME_PREFIX.find(url).map(|scheme| &url[scheme.end()..])
}

/// Extracts the host of a URL that may be missing its scheme.
///
/// The result is lowercased, keeps a port as written and has a leading `www.`
/// removed.
///
/// # Examples
/// ```
/// use smartpac::utils::url::extract_host_from_invalid_url;
///
/// assert_eq!(extract_host_from_invalid_url("example.com/api").as_deref(), Some("example.com"));
/// assert_eq!(extract_host_from_invalid_url("https://www.example.com:8443/").as_deref(), Some("example.com:8443"));
/// assert_eq!(extract_host_from_invalid_url("/api"), None);
/// ```
pub fn extract_host_from_invalid_url(url: &str) -> Option<String> {
    let mut authority = remove_schema_from_url(url).unwrap_or(url);
    if let Some(end) = authority.find(|c| matches!(c, '/' | '?' | '#')) {
        authority = &authority[..end];
    }
    if let Some(at) = authority.rfind('@') {
        authority = &authority[at + 1..];
    }

    let host = authority.to_lowercase();
    let host = match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    };
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Reads the host a browser would pass along with `url`.
///
/// # Examples
/// ```
/// use smartpac::utils::url::host_from_url;
///
/// assert_eq!(host_from_url("https://Docs.Example.com:8443/a").as_deref(), Some("docs.example.com"));
/// assert_eq!(host_from_url("not a url"), None);
/// ```
pub fn host_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(str::to_string)
}
