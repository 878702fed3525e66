//! webcrawl main entry point
//!
//! This is the command-line interface for the webcrawl crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use webcrawl::config::{load_config_with_hash, validate, Config};
use webcrawl::crawler::{Crawler, HttpFetcher, PageDocument, PageOutcome};
use webcrawl::output::{print_statistics, CrawlSummary};
use webcrawl::url::normalize_str;
use webcrawl::{Cache, CrawlError, FollowBehavior, SqliteCache};

/// webcrawl: a concurrent, deduplicating web crawler
///
/// Starting from seed URLs, webcrawl fetches pages with a pool of workers,
/// extracts page metadata, and follows links according to a follow policy
/// until no work remains or the URL limit is reached.
#[derive(Parser, Debug)]
#[command(name = "webcrawl")]
#[command(version)]
#[command(about = "A concurrent, deduplicating web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL (repeatable, or comma separated)
    #[arg(short, long = "url", value_name = "URL", value_delimiter = ',')]
    urls: Vec<String>,

    /// File with one seed URL per line ('#' starts a comment)
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Maximum number of URLs to process
    #[arg(long, value_name = "N")]
    max_urls: Option<u64>,

    /// Number of concurrent workers
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Per-worker delay between requests in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Link follow policy: none, any, same-host, related-subdomains
    #[arg(long, value_name = "MODE")]
    follow: Option<FollowBehavior>,

    /// Disable periodic progress logging
    #[arg(long)]
    no_progress: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);

    if let Some(path) = &cli.file {
        config.seeds.extend(read_seed_file(path)?);
    }
    config.seeds.extend(cli.urls.iter().cloned());

    validate(&config).context("Invalid configuration")?;

    if config.seeds.is_empty() {
        bail!("No seed URLs given; pass --url, --file, or set `seeds` in the config");
    }

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webcrawl=info,warn"),
            1 => EnvFilter::new("webcrawl=debug,info"),
            2 => EnvFilter::new("webcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line flags on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_urls) = cli.max_urls {
        config.crawler.max_urls = max_urls;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.request_delay_ms = delay_ms;
    }
    if let Some(follow) = cli.follow {
        config.crawler.follow = follow;
    }
    if cli.no_progress {
        config.crawler.show_progress = false;
    }
}

/// Reads seed URLs from a file
fn read_seed_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    Ok(parse_seed_lines(&content))
}

/// One URL per line; blank lines and `#` comments are skipped
fn parse_seed_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Handles the --dry-run mode: shows the effective configuration and seeds
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== webcrawl Dry Run ===\n");

    println!("Effective Configuration:");
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    for line in rendered.lines() {
        println!("  {}", line);
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        match normalize_str(seed) {
            Ok(key) => println!("  - {}", key),
            Err(e) => println!("  - {} (invalid: {})", seed, e),
        }
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(config.fetcher_options())?);
    let mut options = config
        .crawler_options::<PageDocument>(fetcher)
        .with_parsers(config.document_parsers()?);

    if let Some(path) = &config.cache.sqlite_path {
        tracing::info!("Using page cache at {}", path);
        let cache: Arc<dyn Cache> = Arc::new(SqliteCache::new(Path::new(path))?);
        options = options.with_cache(cache);
    }

    let crawler = Crawler::new(options);

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping crawl");
            interrupt.cancel();
        }
    });

    let parsed_pages = Arc::new(AtomicU64::new(0));
    let parsed_counter = parsed_pages.clone();
    let started = Instant::now();

    let result = crawler
        .crawl_with_cancellation(
            &config.seeds,
            move |outcome: PageOutcome<PageDocument>| {
                if outcome.parsed.is_some() {
                    parsed_counter.fetch_add(1, Ordering::Relaxed);
                }
                log_outcome(&outcome);
            },
            &token,
        )
        .await;

    match result {
        Ok(()) => tracing::info!("Crawl completed successfully"),
        Err(CrawlError::Cancelled) => tracing::info!("Crawl cancelled"),
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    }

    print_statistics(&CrawlSummary {
        stats: crawler.stats().snapshot(),
        parsed_pages: parsed_pages.load(Ordering::Relaxed),
        elapsed: started.elapsed(),
    });

    Ok(())
}

/// Logs one processed page
fn log_outcome(outcome: &PageOutcome<PageDocument>) {
    let url = outcome.url();
    match (&outcome.error, &outcome.parsed) {
        (Some(error), _) => tracing::warn!(url, error = %error, "Page failed"),
        (None, Some(doc)) => tracing::info!(
            url,
            status = ?outcome.status_code,
            links = outcome.links.len(),
            title = doc.title.as_deref().unwrap_or(""),
            "Page crawled"
        ),
        (None, None) => tracing::info!(
            url,
            status = ?outcome.status_code,
            links = outcome.links.len(),
            "Page crawled"
        ),
    }
}
