//! Page fetching
//!
//! This module defines the fetcher contract used by the workers and the
//! default HTTP implementation:
//! - `Fetcher` trait and its request/response types
//! - Building HTTP clients with proper headers and timeouts
//! - Content-Type and body-size checks
//! - Outbound link extraction from fetched markup

use crate::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum accepted body size (10 MB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Browser-like user agent used when none is configured
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0";

/// A request handed to a fetcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// The URL to fetch
    pub url: String,

    /// Fetcher-selection hint (e.g. "http")
    pub fetcher: String,

    /// Extra request headers
    pub headers: HashMap<String, String>,
}

impl FetchRequest {
    /// Creates a request for `url` carrying the given fetcher hint
    pub fn new(url: impl Into<String>, fetcher: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fetcher: fetcher.into(),
            headers: HashMap::new(),
        }
    }
}

/// A link found on a page, exactly as it appeared in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The raw href value
    pub url: String,

    /// The anchor text
    pub text: String,
}

impl Link {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: String::new(),
        }
    }
}

/// A fetched page
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    /// The requested URL
    pub url: String,

    /// HTTP status code (absent for cached pages)
    pub status_code: Option<u16>,

    /// Response headers, first value per name
    pub headers: HashMap<String, String>,

    /// Raw markup
    pub html: String,

    /// Outbound link candidates
    pub links: Vec<Link>,

    /// When the page was fetched (absent for cached pages)
    pub timestamp: Option<DateTime<Utc>>,
}

impl FetchResponse {
    /// Builds the response synthesized on a cache hit: markup only
    pub fn from_cache(url: impl Into<String>, html: String) -> Self {
        Self {
            url: url.into(),
            html,
            ..Self::default()
        }
    }
}

/// Fetches pages for the crawler
///
/// Implementations are shared by all workers and must be thread-safe.
/// Timeouts are the fetcher's responsibility.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page and returns its markup and link candidates
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}

/// Options for [`HttpFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcherOptions {
    /// Per-request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Default headers applied to every request
    pub headers: HashMap<String, String>,

    /// Maximum accepted body size in bytes
    pub max_body_bytes: usize,
}

impl Default for HttpFetcherOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: default_headers(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Headers sent by default so that requests resemble a regular browser
pub fn default_headers() -> HashMap<String, String> {
    [
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
        ("Accept-Language", "en-US,en;q=0.5"),
        ("Upgrade-Insecure-Requests", "1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `options` - Fetcher options (timeout, user agent, default headers)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(options: &HttpFetcherOptions) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid default header"),
        }
    }

    Client::builder()
        .user_agent(options.user_agent.clone())
        .default_headers(headers)
        .timeout(options.timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a plain HTTP GET
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Creates a new HTTP fetcher
    pub fn new(options: HttpFetcherOptions) -> Result<Self, FetchError> {
        let client = build_http_client(&options).map_err(|source| FetchError::Http {
            url: String::new(),
            source,
        })?;
        Ok(Self {
            client,
            max_body_bytes: options.max_body_bytes,
        })
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL with a single GET
    ///
    /// # Request Flow
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Transport failure / timeout | `FetchError::Http` |
    /// | Non-2xx status | `FetchError::Status` |
    /// | Content-Type without `text/html` | `FetchError::UnexpectedContentType` |
    /// | Body over the size limit | `FetchError::BodyTooLarge` |
    ///
    /// There is no retry at this layer.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let url = request.url.as_str();
        let mut builder = self.client.get(url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("text/html") {
            return Err(FetchError::UnexpectedContentType {
                url: url.to_string(),
                content_type,
            });
        }

        if let Some(length) = response.content_length() {
            if length as usize > self.max_body_bytes {
                return Err(FetchError::BodyTooLarge {
                    url: url.to_string(),
                    limit: self.max_body_bytes,
                });
            }
        }

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_string())
                    .or_insert_with(|| value.to_string());
            }
        }

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        if body.len() > self.max_body_bytes {
            return Err(FetchError::BodyTooLarge {
                url: url.to_string(),
                limit: self.max_body_bytes,
            });
        }

        let html = String::from_utf8_lossy(&body).into_owned();
        let links = extract_links(&html);

        Ok(FetchResponse {
            url: url.to_string(),
            status_code: Some(status.as_u16()),
            headers,
            html,
            links,
            timestamp: Some(Utc::now()),
        })
    }
}

/// Extracts raw link candidates from `<a href>` tags
///
/// Anchors carrying a `download` attribute and empty hrefs are skipped.
/// Resolution and scheme filtering happen later, in the crawler.
pub fn extract_links(html: &str) -> Vec<Link> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if href.is_empty() {
                    continue;
                }
                let text = element
                    .text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                links.push(Link {
                    url: href.to_string(),
                    text,
                });
            }
        }
    }

    links
}
