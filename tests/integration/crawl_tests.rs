//! Integration tests for the crawler
//!
//! The HTTP fetcher is exercised against wiremock servers. Crawl runs use
//! either a fetcher that maps a fake https site onto a mock server or
//! in-memory link graphs, since every admitted URL is normalized to https.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};
use tokio_util::sync::CancellationToken;
use webcrawl::config::load_config;
use webcrawl::crawler::{
    DocumentParser, FetchRequest, FetchResponse, Fetcher, HttpFetcher, HttpFetcherOptions, Link,
    MatchType, PageDocument, PageOutcome, Parser, ParserRegistry, ParserRule,
};
use webcrawl::{
    Cache, CrawlError, Crawler, CrawlerOptions, FetchError, FollowBehavior, MemoryCache,
    ParseError, SqliteCache,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

/// Serves `https://site.test/...` from a mock server
struct MockSiteFetcher {
    inner: HttpFetcher,
    origin: String,
}

impl MockSiteFetcher {
    fn new(server: &MockServer) -> Self {
        Self {
            inner: HttpFetcher::new(HttpFetcherOptions::default()).unwrap(),
            origin: server.uri(),
        }
    }
}

#[async_trait]
impl Fetcher for MockSiteFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let path = request.url.trim_start_matches("https://site.test");
        let mut rewritten = request.clone();
        rewritten.url = format!("{}{}", self.origin, if path.is_empty() { "/" } else { path });
        let mut response = self.inner.fetch(&rewritten).await?;
        response.url = request.url.clone();
        Ok(response)
    }
}

/// Serves pages from an in-memory link graph
#[derive(Default)]
struct GraphFetcher {
    pages: HashMap<String, Vec<String>>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Duration,
}

impl GraphFetcher {
    fn new(pages: &[(&str, &[&str])]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, links)| {
                    (
                        url.to_string(),
                        links.iter().map(|l| l.to_string()).collect(),
                    )
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Root plus `pages` children, every page linking to every child in
    /// both relative and non-canonical absolute spellings
    fn dense(pages: usize) -> Self {
        let links: Vec<String> = (0..pages)
            .flat_map(|i| {
                [
                    format!("/p{}", i),
                    format!("http://example.com/p{}?ref={}#top", i, i),
                ]
            })
            .collect();

        let mut graph = HashMap::new();
        graph.insert("https://example.com".to_string(), links.clone());
        for i in 0..pages {
            graph.insert(format!("https://example.com/p{}", i), links.clone());
        }

        Self {
            pages: graph,
            ..Self::default()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Fetcher for GraphFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        *self
            .calls
            .lock()
            .unwrap()
            .entry(request.url.clone())
            .or_insert(0) += 1;

        match self.pages.get(&request.url) {
            Some(links) => Ok(FetchResponse {
                url: request.url.clone(),
                status_code: Some(200),
                html: format!("<html><title>{}</title></html>", request.url),
                links: links.iter().map(Link::new).collect(),
                ..FetchResponse::default()
            }),
            None => Err(FetchError::Status {
                url: request.url.clone(),
                status: 404,
            }),
        }
    }
}

/// Every page links to ten children below its own path
struct EndlessFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for EndlessFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        let path = request.url.trim_start_matches("https://example.com");
        Ok(FetchResponse {
            url: request.url.clone(),
            html: "<html></html>".to_string(),
            links: (0..10).map(|i| Link::new(format!("{}/{}", path, i))).collect(),
            ..FetchResponse::default()
        })
    }
}

/// Records the URL and error state of every outcome
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(String, bool)>>>);

impl Recorder {
    fn callback<T: 'static>(&self) -> impl Fn(PageOutcome<T>) + Send + Sync + 'static {
        let inner = self.0.clone();
        move |outcome: PageOutcome<T>| {
            inner
                .lock()
                .unwrap()
                .push((outcome.url().to_string(), outcome.error.is_some()))
        }
    }

    fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.0.lock().unwrap().iter().map(|(u, _)| u.clone()).collect();
        urls.sort();
        urls
    }

    fn errors(&self) -> usize {
        self.0.lock().unwrap().iter().filter(|(_, e)| *e).count()
    }
}

fn options<T>(fetcher: Arc<dyn Fetcher>) -> CrawlerOptions<T> {
    CrawlerOptions::new(fetcher).with_idle_check_interval(Duration::from_millis(20))
}

async fn crawl_within<T: Send + 'static>(
    crawler: &Crawler<T>,
    seeds: &[&str],
    recorder: &Recorder,
) -> Result<(), CrawlError> {
    tokio::time::timeout(
        Duration::from_secs(10),
        crawler.crawl(seeds, recorder.callback()),
    )
    .await
    .expect("crawl did not stop on its own")
}

// ===== HttpFetcher =====

#[tokio::test]
async fn test_http_fetcher_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><a href="/about">About</a><a href="/dl.zip" download>Zip</a></body></html>"#,
        ))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(HttpFetcherOptions::default()).unwrap();
    let response = fetcher
        .fetch(&FetchRequest::new(format!("{}/", server.uri()), "http"))
        .await
        .unwrap();

    assert_eq!(response.status_code, Some(200));
    assert!(response.html.contains("About"));
    assert_eq!(response.links, vec![Link {
        url: "/about".to_string(),
        text: "About".to_string(),
    }]);
    assert!(response
        .headers
        .get("content-type")
        .map_or(false, |v| v.starts_with("text/html")));
    assert!(response.timestamp.is_some());
}

#[tokio::test]
async fn test_http_fetcher_sends_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-crawl-test", "yes"))
        .and(header("user-agent", "webcrawl-test/1.0"))
        .respond_with(html("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut options = HttpFetcherOptions::default();
    options.user_agent = "webcrawl-test/1.0".to_string();
    options
        .headers
        .insert("X-Crawl-Test".to_string(), "yes".to_string());
    let fetcher = HttpFetcher::new(options).unwrap();

    let result = fetcher
        .fetch(&FetchRequest::new(server.uri(), "http"))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_http_fetcher_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(HttpFetcherOptions::default()).unwrap();
    let result = fetcher
        .fetch(&FetchRequest::new(format!("{}/missing", server.uri()), "http"))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_http_fetcher_rejects_non_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(HttpFetcherOptions::default()).unwrap();
    let result = fetcher.fetch(&FetchRequest::new(server.uri(), "http")).await;

    assert!(matches!(
        result,
        Err(FetchError::UnexpectedContentType { content_type, .. }) if content_type == "application/json"
    ));
}

#[tokio::test]
async fn test_http_fetcher_body_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(&"x".repeat(1024)))
        .mount(&server)
        .await;

    let mut options = HttpFetcherOptions::default();
    options.max_body_bytes = 100;
    let fetcher = HttpFetcher::new(options).unwrap();
    let result = fetcher.fetch(&FetchRequest::new(server.uri(), "http")).await;

    assert!(matches!(result, Err(FetchError::BodyTooLarge { limit: 100, .. })));
}

// ===== End-to-end crawls =====

#[tokio::test]
async fn test_full_crawl_against_mock_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><title>Home</title></head><body>
            <a href="/page1">Page 1</a>
            <a href="/page2#section">Page 2</a>
            <a href="https://elsewhere.test/">Elsewhere</a>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(
            r#"<html><head><title>Page 1</title></head><body><a href="/">Home</a></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html(
            r#"<html><head><title>Page 2</title></head><body><a href="/page1?ref=2">One</a></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let titles = Arc::new(Mutex::new(Vec::new()));
    let seen = titles.clone();
    let crawler = Crawler::new(
        options::<PageDocument>(Arc::new(MockSiteFetcher::new(&server))).with_parsers(
            ParserRegistry::new().with_default(Arc::new(DocumentParser)),
        ),
    );

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        crawler.crawl(&["https://site.test"], move |outcome| {
            if let Some(doc) = outcome.parsed {
                seen.lock().unwrap().push(doc.title.unwrap_or_default());
            }
        }),
    )
    .await
    .unwrap();

    assert!(result.is_ok());
    let mut titles = titles.lock().unwrap().clone();
    titles.sort();
    assert_eq!(titles, vec!["Home", "Page 1", "Page 2"]);

    let stats = crawler.stats().snapshot();
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.succeeded, 3);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let fetcher = Arc::new(GraphFetcher::new(&[
        ("https://example.com", &["/a", "/b", "https://example.com/a#x"]),
        ("https://example.com/a", &["/b", "/", "http://example.com/a"]),
        ("https://example.com/b", &["/a", "https://example.com"]),
    ]));
    let recorder = Recorder::default();
    let crawler = Crawler::new(options::<()>(fetcher.clone()).with_workers(4));

    crawl_within(&crawler, &["https://example.com", "example.com/"], &recorder)
        .await
        .unwrap();

    assert_eq!(fetcher.calls("https://example.com"), 1);
    assert_eq!(fetcher.calls("https://example.com/a"), 1);
    assert_eq!(fetcher.calls("https://example.com/b"), 1);
    assert_eq!(recorder.urls().len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_no_duplicates_across_parallel_workers() {
    let pages = 200;
    for _ in 0..3 {
        let fetcher = Arc::new(GraphFetcher::dense(pages));
        let recorder = Recorder::default();
        let crawler = Crawler::new(
            options::<()>(fetcher.clone())
                .with_workers(16)
                .with_max_urls(10_000),
        );

        crawl_within(&crawler, &["https://example.com"], &recorder)
            .await
            .unwrap();

        let delivered = recorder.urls();
        let mut unique = delivered.clone();
        unique.dedup();
        assert_eq!(delivered.len(), pages + 1);
        assert_eq!(unique.len(), delivered.len());
        assert_eq!(fetcher.total_calls(), pages + 1);
        assert_eq!(fetcher.calls("https://example.com/p0"), 1);
        assert_eq!(crawler.stats().processed(), (pages + 1) as u64);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_url_limit_is_soft_cap_in_parallel() {
    let fetcher = Arc::new(EndlessFetcher {
        calls: AtomicUsize::new(0),
    });
    let workers = 8;
    let crawler = Crawler::new(
        options::<()>(fetcher.clone())
            .with_workers(workers)
            .with_max_urls(25),
    );
    let recorder = Recorder::default();

    crawl_within(&crawler, &["https://example.com"], &recorder)
        .await
        .unwrap();

    let processed = crawler.stats().processed();
    assert!(processed >= 25);
    assert!(processed <= 25 + workers as u64);
    assert_eq!(recorder.urls().len() as u64, processed);
}

#[tokio::test]
async fn test_url_limit_is_soft_cap() {
    let fetcher = Arc::new(EndlessFetcher {
        calls: AtomicUsize::new(0),
    });
    let workers = 3;
    let crawler = Crawler::new(
        options::<()>(fetcher.clone())
            .with_workers(workers)
            .with_max_urls(10),
    );
    let recorder = Recorder::default();

    crawl_within(&crawler, &["https://example.com"], &recorder)
        .await
        .unwrap();

    let processed = crawler.stats().processed();
    assert!(processed >= 10);
    assert!(processed <= 10 + workers as u64);
}

#[tokio::test]
async fn test_follow_none_processes_only_seeds() {
    let fetcher = Arc::new(GraphFetcher::new(&[
        ("https://example.com", &["/a", "/b"]),
        ("https://example.org", &["/c"]),
    ]));
    let crawler = Crawler::new(options::<()>(fetcher.clone()).with_follow(FollowBehavior::None));
    let recorder = Recorder::default();

    crawl_within(&crawler, &["example.com", "example.org"], &recorder)
        .await
        .unwrap();

    assert_eq!(
        recorder.urls(),
        vec!["https://example.com", "https://example.org"]
    );
    assert_eq!(fetcher.total_calls(), 2);
}

#[tokio::test]
async fn test_follow_behaviors_across_hosts() {
    let graph: &[(&str, &[&str])] = &[
        (
            "https://example.com",
            &["/a", "https://other.com/b", "https://sub.example.com/c"],
        ),
        ("https://example.com/a", &[]),
        ("https://other.com/b", &[]),
        ("https://sub.example.com/c", &[]),
    ];

    for (behavior, expected) in [
        (FollowBehavior::SameHost, 2),
        (FollowBehavior::RelatedSubdomains, 3),
        (FollowBehavior::Any, 4),
    ] {
        let fetcher = Arc::new(GraphFetcher::new(graph));
        let crawler = Crawler::new(options::<()>(fetcher.clone()).with_follow(behavior));
        let recorder = Recorder::default();

        crawl_within(&crawler, &["https://example.com"], &recorder)
            .await
            .unwrap();

        assert_eq!(recorder.urls().len(), expected, "behavior {}", behavior);
    }
}

#[tokio::test]
async fn test_cache_hit_skips_fetcher() {
    let cache = Arc::new(MemoryCache::new());
    cache
        .set("https://example.com", b"<html><title>Cached</title></html>")
        .await
        .unwrap();

    let fetcher = Arc::new(GraphFetcher::new(&[("https://example.com", &["/a"])]));
    let titles = Arc::new(Mutex::new(Vec::new()));
    let seen = titles.clone();
    let crawler = Crawler::new(
        options::<PageDocument>(fetcher.clone())
            .with_cache(cache.clone())
            .with_parsers(ParserRegistry::new().with_default(Arc::new(DocumentParser))),
    );

    crawler
        .crawl(&["https://example.com"], move |outcome| {
            if let Some(doc) = outcome.parsed {
                seen.lock().unwrap().push(doc.title);
            }
        })
        .await
        .unwrap();

    assert_eq!(fetcher.total_calls(), 0);
    assert_eq!(*titles.lock().unwrap(), vec![Some("Cached".to_string())]);
    // Cached pages carry no links, so nothing else is crawled
    assert_eq!(crawler.stats().processed(), 1);
}

#[tokio::test]
async fn test_sqlite_cache_reused_across_runs() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("cache.db");
    let graph: &[(&str, &[&str])] = &[("https://example.com", &[])];

    {
        let fetcher = Arc::new(GraphFetcher::new(graph));
        let cache = Arc::new(SqliteCache::new(&db_path).unwrap());
        let crawler = Crawler::new(options::<()>(fetcher.clone()).with_cache(cache.clone()));
        crawl_within(&crawler, &["https://example.com"], &Recorder::default())
            .await
            .unwrap();

        assert_eq!(fetcher.total_calls(), 1);
        assert_eq!(cache.len().unwrap(), 1);
    }

    let fetcher = Arc::new(GraphFetcher::new(graph));
    let cache = Arc::new(SqliteCache::new(&db_path).unwrap());
    let crawler = Crawler::new(options::<()>(fetcher.clone()).with_cache(cache));
    crawl_within(&crawler, &["https://example.com"], &Recorder::default())
        .await
        .unwrap();

    assert_eq!(fetcher.total_calls(), 0);
    assert_eq!(crawler.stats().succeeded(), 1);
}

#[tokio::test]
async fn test_errors_do_not_abort_run() {
    let fetcher = Arc::new(GraphFetcher::new(&[("https://good.example.com", &[])]));
    let crawler = Crawler::new(options::<()>(fetcher));
    let recorder = Recorder::default();

    let result = crawl_within(
        &crawler,
        &["https://good.example.com", "https://missing.example.com"],
        &recorder,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(recorder.urls().len(), 2);
    assert_eq!(recorder.errors(), 1);

    let stats = crawler.stats().snapshot();
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 1);
}

#[tokio::test]
async fn test_invalid_seeds_are_skipped() {
    let fetcher = Arc::new(GraphFetcher::new(&[("https://example.com", &[])]));
    let crawler = Crawler::new(options::<()>(fetcher));
    let recorder = Recorder::default();

    crawl_within(
        &crawler,
        &["ftp://example.com", "   ", "https://example.com"],
        &recorder,
    )
    .await
    .unwrap();

    assert_eq!(recorder.urls(), vec!["https://example.com"]);
}

#[tokio::test]
async fn test_second_concurrent_crawl_is_rejected() {
    let fetcher = Arc::new(
        GraphFetcher::new(&[("https://example.com", &[])]).with_delay(Duration::from_millis(100)),
    );
    let crawler = Crawler::new(options::<()>(fetcher));
    let recorder = Recorder::default();

    let (first, second) = tokio::join!(
        crawler.crawl(&["https://example.com"], recorder.callback()),
        crawler.crawl(&["https://example.com"], recorder.callback()),
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(CrawlError::AlreadyRunning)));
    assert_eq!(recorder.urls().len(), 1);

    // The crawler is reusable once the first run ends
    assert!(!crawler.is_running());
    crawl_within(&crawler, &["https://example.com"], &recorder)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancelled_before_seeding() {
    let fetcher = Arc::new(GraphFetcher::new(&[("https://example.com", &[])]));
    let crawler = Crawler::new(options::<()>(fetcher.clone()));
    let token = CancellationToken::new();
    token.cancel();

    let result = crawler
        .crawl_with_cancellation(&["https://example.com"], |_: PageOutcome<()>| {}, &token)
        .await;

    assert!(matches!(result, Err(CrawlError::Cancelled)));
    assert_eq!(fetcher.total_calls(), 0);
}

#[tokio::test]
async fn test_cancel_mid_run_stops_workers() {
    let fetcher = Arc::new(EndlessFetcher {
        calls: AtomicUsize::new(0),
    });
    let crawler = Crawler::new(options::<()>(fetcher).with_max_urls(1_000_000));
    let token = CancellationToken::new();
    let canceller = token.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(10),
        crawler.crawl_with_cancellation(&["https://example.com"], |_: PageOutcome<()>| {}, &token),
    )
    .await
    .unwrap();

    assert!(result.is_ok());
    assert!(crawler.stats().processed() < 1_000_000);
}

#[tokio::test]
async fn test_full_queue_drops_links_and_terminates() {
    let fetcher = Arc::new(GraphFetcher::new(&[
        (
            "https://example.com",
            &["/1", "/2", "/3", "/4", "/5", "/6", "/7", "/8"],
        ),
        ("https://example.com/1", &["/2", "/3"]),
    ]));
    let crawler = Crawler::new(
        options::<()>(fetcher.clone())
            .with_workers(1)
            .with_queue_size(1),
    );
    let recorder = Recorder::default();

    crawl_within(&crawler, &["https://example.com"], &recorder)
        .await
        .unwrap();

    // Only the first link fits; dropped links are never retried
    assert_eq!(
        recorder.urls(),
        vec!["https://example.com", "https://example.com/1"]
    );
}

#[tokio::test]
async fn test_parser_rules_select_by_host() {
    struct HostParser;

    #[async_trait]
    impl Parser for HostParser {
        type Output = String;

        async fn parse(&self, page: &FetchResponse) -> Result<String, ParseError> {
            if page.url.contains("broken") {
                return Err(ParseError::Message("unparseable".to_string()));
            }
            Ok(format!("blog:{}", page.url))
        }
    }

    let fetcher = Arc::new(GraphFetcher::new(&[
        ("https://example.com", &["https://blog.example.com/post", "https://blog.example.com/broken"]),
        ("https://blog.example.com/post", &[]),
        ("https://blog.example.com/broken", &[]),
    ]));
    let parsers = ParserRegistry::new().with_rule(
        ParserRule::new("blog.", MatchType::Prefix, 1, Arc::new(HostParser)).unwrap(),
    );
    let crawler = Crawler::new(
        options::<String>(fetcher)
            .with_follow(FollowBehavior::RelatedSubdomains)
            .with_parsers(parsers),
    );

    let parsed = Arc::new(Mutex::new(Vec::new()));
    let failures = Arc::new(AtomicUsize::new(0));
    let (sink, failed) = (parsed.clone(), failures.clone());
    crawler
        .crawl(&["https://example.com"], move |outcome| {
            if let Some(value) = outcome.parsed {
                sink.lock().unwrap().push(value);
            }
            if matches!(outcome.error, Some(CrawlError::Parse(_))) {
                failed.fetch_add(1, Ordering::SeqCst);
            }
        })
        .await
        .unwrap();

    assert_eq!(
        *parsed.lock().unwrap(),
        vec!["blog:https://blog.example.com/post".to_string()]
    );
    assert_eq!(failures.load(Ordering::SeqCst), 1);
    // Parse failures still count as succeeded pages
    assert_eq!(crawler.stats().succeeded(), 3);
}

// ===== Configuration =====

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
seeds = ["example.com"]

[crawler]
max-urls = 2
workers = 1
follow = "any"
show-progress = false
idle-check-interval-ms = 20

[[parser]]
pattern = "example.com"
match = "exact"
"#
    )
    .unwrap();
    file.flush().unwrap();

    let config = load_config(file.path()).unwrap();
    let fetcher = Arc::new(GraphFetcher::new(&[
        ("https://example.com", &["/a", "/b", "/c"]),
        ("https://example.com/a", &[]),
        ("https://example.com/b", &[]),
        ("https://example.com/c", &[]),
    ]));
    let crawler = Crawler::new(
        config
            .crawler_options::<PageDocument>(fetcher)
            .with_parsers(config.document_parsers().unwrap()),
    );
    let recorder = Recorder::default();

    crawl_within(
        &crawler,
        &config.seeds.iter().map(String::as_str).collect::<Vec<_>>(),
        &recorder,
    )
    .await
    .unwrap();

    assert_eq!(crawler.stats().processed(), 2);
    assert_eq!(recorder.errors(), 0);
}
