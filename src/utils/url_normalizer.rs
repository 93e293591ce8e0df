//! URL normalization for click aggregation.
//!
//! Mailchimp reports one row per link occurrence, so the same destination can
//! appear several times with different tracking parameters. Reducing each URL
//! to its host and path lets those rows be summed under a single key.

use url::Url;

/// Errors that can occur during URL normalization.
///
/// Either variant means the link is malformed for reporting purposes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Normalizes a clicked URL to its aggregation key.
///
/// # Normalization Rules
///
/// 1. **Scheme**: Dropped
/// 2. **Userinfo**: Dropped
/// 3. **Hostname**: Lowercased by parsing
/// 4. **Port**: Kept only when it is not the scheme default (`host:port`)
/// 5. **Path**: Preserved with case sensitivity, as parsed
/// 6. **Query parameters and fragment**: Dropped
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for unparseable input.
/// Returns [`UrlNormalizationError::MissingHost`] for URLs without a host,
/// such as `mailto:` links, rather than producing an empty key.
///
/// # Examples
///
/// ```
/// use mailchimp_top_links::utils::url_normalizer::normalize_link;
///
/// assert_eq!(
///     normalize_link("https://example.com/page?utm_source=newsletter#top").unwrap(),
///     "example.com/page"
/// );
/// ```
pub fn normalize_link(input: &str) -> Result<String, UrlNormalizationError> {
    let url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return Err(UrlNormalizationError::MissingHost(input.to_string())),
    };

    // `Url::port` is already `None` for the scheme's default port.
    let key = match url.port() {
        Some(port) => format!("{host}:{port}{}", url.path()),
        None => format!("{host}{}", url.path()),
    };

    Ok(key)
}
