use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a raw URL string into a comparable crawl unit
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject an empty string
/// 2. Reject any explicit scheme other than http/https
/// 3. Prepend `https://` when no scheme is present
/// 4. Rewrite `http://` to `https://`
/// 5. Parse the URL; reject if malformed
/// 6. Remove the query string and fragment
///
/// A bare root path is collapsed when the URL is rendered as a key, see
/// [`canonical_key`].
///
/// # Arguments
///
/// * `raw` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Empty input, disallowed scheme or malformed URL
///
/// # Examples
///
/// ```
/// use webcrawl::url::normalize_url;
///
/// let url = normalize_url("  http://example.com/page?utm_source=x#top ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(raw: &str) -> UrlResult<Url> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(UrlError::Empty);
    }

    let lower = value.to_ascii_lowercase();
    let value = if lower.starts_with("https://") {
        value.to_string()
    } else if lower.starts_with("http://") {
        format!("https://{}", &value["http://".len()..])
    } else if value.contains("://") {
        return Err(UrlError::InvalidScheme(value.to_string()));
    } else {
        format!("https://{}", value)
    };

    let mut url = Url::parse(&value).map_err(|e| UrlError::Parse(format!("{}: {}", value, e)))?;

    // Catches inputs such as "httpx://host" that slip past the prefix check
    if url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Renders a normalized URL as its canonical key string
///
/// The `url` crate always serializes an empty http(s) path as `/`, so the root
/// slash is stripped here. Non-root trailing slashes are preserved.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webcrawl::url::canonical_key;
///
/// let url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(canonical_key(&url), "https://example.com");
/// ```
pub fn canonical_key(url: &Url) -> String {
    let rendered = url.as_str();
    if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
        rendered.trim_end_matches('/').to_string()
    } else {
        rendered.to_string()
    }
}

/// Normalizes a raw URL string straight to its canonical key
///
/// This is the admission gate used by the frontier: two inputs that produce
/// the same key are the same crawl unit for the rest of a run.
pub fn normalize_str(raw: &str) -> UrlResult<String> {
    normalize_url(raw).map(|url| canonical_key(&url))
}
