//! Input validation for caller-supplied codes and destination URLs

use axum::http::HeaderValue;
use url::Url;

/// Shortest accepted caller-supplied code.
pub const MIN_CODE_LENGTH: usize = 6;

/// Longest accepted caller-supplied code.
pub const MAX_CODE_LENGTH: usize = 8;

/// Returns true iff `code` is 6 to 8 ASCII alphanumeric characters.
pub fn is_valid_code(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Returns true iff `url` parses as an absolute URL and can be sent verbatim
/// as a `Location` header.
///
/// Any scheme is accepted (`mailto:`, `ftp:` and so on); relative references
/// such as `example.com` or `/path` are rejected. The parser silently drops
/// CR, LF and tab, so control characters are checked separately.
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok() && HeaderValue::from_bytes(url.as_bytes()).is_ok()
}
