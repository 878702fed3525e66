use url::Url;

/// Extracts the host from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// The port is not part of the result.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webcrawl::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the last two dot-separated labels of a host
///
/// Hosts with fewer than two labels (e.g. `localhost`) have no base domain.
///
/// # Examples
///
/// ```
/// use webcrawl::url::base_domain;
///
/// assert_eq!(base_domain("blog.example.com"), Some("example.com"));
/// assert_eq!(base_domain("localhost"), None);
/// ```
pub fn base_domain(host: &str) -> Option<&str> {
    let mut dots = host.rmatch_indices('.');
    dots.next()?;
    match dots.next() {
        Some((idx, _)) => Some(&host[idx + 1..]),
        None => Some(host),
    }
}
