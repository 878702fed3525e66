use crate::url::normalize::normalize_str;
use url::{ParseError, Url};

/// Resolves a link found on a page into an absolute, normalized URL
///
/// Absolute links must use http or https; anything else (`mailto:`,
/// `javascript:`, `ftp:`, ...) is rejected. Relative links are resolved
/// against `page_domain`, which is coerced to an `https://` base when it has
/// no scheme. The result is passed through the normalizer, so fragments and
/// query strings never survive.
///
/// # Arguments
///
/// * `page_domain` - Host of the page the link was found on (a full
///   `https://` base is accepted too)
/// * `raw_link` - The href as found in the markup
///
/// # Returns
///
/// * `Some(String)` - The canonical key of the resolved link
/// * `None` - The link is unusable
///
/// # Examples
///
/// ```
/// use webcrawl::url::resolve_link;
///
/// assert_eq!(resolve_link("example.com", "/about").as_deref(), Some("https://example.com/about"));
/// assert_eq!(resolve_link("example.com", "javascript:void(0)"), None);
/// assert_eq!(resolve_link("example.com", "https://x.com/p#frag").as_deref(), Some("https://x.com/p"));
/// ```
pub fn resolve_link(page_domain: &str, raw_link: &str) -> Option<String> {
    let raw_link = raw_link.trim();

    let mut resolved = match Url::parse(raw_link) {
        Ok(absolute) => {
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                return None;
            }
            absolute
        }
        Err(ParseError::RelativeUrlWithoutBase) => {
            let base = base_for(page_domain)?;
            base.join(raw_link).ok()?
        }
        Err(_) => return None,
    };

    resolved.set_fragment(None);
    normalize_str(resolved.as_str()).ok()
}

/// Builds the https base URL used to resolve relative links
fn base_for(page_domain: &str) -> Option<Url> {
    let lower = page_domain.to_ascii_lowercase();
    let base = if lower.starts_with("http://") || lower.starts_with("https://") {
        page_domain.to_string()
    } else {
        format!("https://{}", page_domain)
    };
    Url::parse(&base).ok()
}
