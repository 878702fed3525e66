//! Page parsers and parser dispatch
//!
//! This module handles turning fetched pages into caller-defined values:
//! - The `Parser` trait implemented by callers
//! - Per-host dispatch (exact host, pattern rules, default parser)
//! - `DocumentParser`, a ready-made parser extracting page metadata

use crate::crawler::fetcher::FetchResponse;
use crate::url::matches_glob;
use crate::{ConfigError, ParseError};
use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Turns a fetched page into a parsed value
///
/// Parsers are shared by all workers and must be thread-safe.
#[async_trait]
pub trait Parser: Send + Sync {
    /// The value produced for each page
    type Output: Send;

    /// Parses a fetched page
    async fn parse(&self, page: &FetchResponse) -> Result<Self::Output, ParseError>;
}

/// Shared handle to a parser producing `T`
pub type SharedParser<T> = Arc<dyn Parser<Output = T>>;

/// How a parser rule pattern is compared against a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    /// Host equals the pattern
    Exact,
    /// Host starts with the pattern (e.g. "blog.")
    Prefix,
    /// Host ends with the pattern (e.g. ".org")
    Suffix,
    /// Glob pattern (e.g. "*.example.com")
    Glob,
    /// Regular expression
    Regex,
}

/// A pattern-based rule selecting a parser for matching hosts
pub struct ParserRule<T> {
    pattern: String,
    match_type: MatchType,
    priority: i32,
    parser: SharedParser<T>,
    compiled: Option<Regex>,
}

impl<T> ParserRule<T> {
    /// Creates a rule, compiling regex patterns up front
    ///
    /// # Returns
    ///
    /// * `Ok(ParserRule)` - The rule is usable
    /// * `Err(ConfigError::InvalidPattern)` - Empty pattern or invalid regex
    pub fn new(
        pattern: impl Into<String>,
        match_type: MatchType,
        priority: i32,
        parser: SharedParser<T>,
    ) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "parser rule pattern cannot be empty".to_string(),
            ));
        }

        let compiled = match match_type {
            MatchType::Regex => Some(
                Regex::new(&pattern)
                    .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", pattern, e)))?,
            ),
            _ => None,
        };

        Ok(Self {
            pattern,
            match_type,
            priority,
            parser,
            compiled,
        })
    }

    /// Returns true if the rule applies to `host`
    pub fn matches(&self, host: &str) -> bool {
        match self.match_type {
            MatchType::Exact => host == self.pattern,
            MatchType::Prefix => host.starts_with(&self.pattern),
            MatchType::Suffix => host.ends_with(&self.pattern),
            MatchType::Glob => matches_glob(&self.pattern, host),
            MatchType::Regex => self
                .compiled
                .as_ref()
                .map_or(false, |re| re.is_match(host)),
        }
    }
}

/// Selects the parser for a page's host
///
/// Lookup order: exact host entry, then rules by descending priority (ties
/// keep insertion order), then the default parser.
pub struct ParserRegistry<T> {
    by_host: HashMap<String, SharedParser<T>>,
    rules: Vec<ParserRule<T>>,
    default: Option<SharedParser<T>>,
}

impl<T> Default for ParserRegistry<T> {
    fn default() -> Self {
        Self {
            by_host: HashMap::new(),
            rules: Vec::new(),
            default: None,
        }
    }
}

impl<T> ParserRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parser for an exact host
    pub fn with_parser(mut self, host: impl Into<String>, parser: SharedParser<T>) -> Self {
        self.by_host.insert(host.into(), parser);
        self
    }

    /// Adds a pattern rule
    pub fn with_rule(mut self, rule: ParserRule<T>) -> Self {
        // Stable sort keeps insertion order among equal priorities
        self.rules.push(rule);
        self.rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        self
    }

    /// Sets the fallback parser
    pub fn with_default(mut self, parser: SharedParser<T>) -> Self {
        self.default = Some(parser);
        self
    }

    /// Picks the parser for `host`, if any
    pub fn select(&self, host: &str) -> Option<&SharedParser<T>> {
        if let Some(parser) = self.by_host.get(host) {
            return Some(parser);
        }
        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(host)) {
            return Some(&rule.parser);
        }
        self.default.as_ref()
    }

    /// Returns true if no parser can ever be selected
    pub fn is_empty(&self) -> bool {
        self.by_host.is_empty() && self.rules.is_empty() && self.default.is_none()
    }
}

/// Metadata extracted from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageDocument {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub language: Option<String>,
    pub heading: Option<String>,
    pub link_count: usize,
}

/// Parser extracting [`PageDocument`] metadata with `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentParser;

#[async_trait]
impl Parser for DocumentParser {
    type Output = PageDocument;

    async fn parse(&self, page: &FetchResponse) -> Result<PageDocument, ParseError> {
        parse_document(&page.url, &page.html)
    }
}

/// Parses HTML content and extracts page metadata
///
/// # Extraction Rules
///
/// - Title: `<title>`, then `og:title`, then `<meta name="title">`
/// - Description: `<meta name="description">`, then `og:description`
/// - Canonical: `<link rel="canonical">`
/// - Language: `lang` attribute of `<html>`, lowercased
/// - Heading: first `<h1>`
///
/// All text is trimmed and whitespace-collapsed; empty values become `None`.
pub fn parse_document(url: &str, html: &str) -> Result<PageDocument, ParseError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, "title")?
        .or(first_attr(&document, "meta[property='og:title']", "content")?)
        .or(first_attr(&document, "meta[name='title']", "content")?);

    let description = first_attr(&document, "meta[name='description']", "content")?
        .or(first_attr(&document, "meta[property='og:description']", "content")?);

    let canonical = first_attr(&document, "link[rel='canonical']", "href")?;
    let language = first_attr(&document, "html", "lang")?.map(|lang| lang.to_lowercase());
    let heading = first_text(&document, "h1")?;
    let link_count = document.select(&selector("a[href]")?).count();

    Ok(PageDocument {
        url: url.to_string(),
        title,
        description,
        canonical,
        language,
        heading,
        link_count,
    })
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector(format!("{}: {:?}", css, e)))
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>, ParseError> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .next()
        .and_then(|element| normalize_text(&element.text().collect::<String>())))
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Result<Option<String>, ParseError> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .next()
        .and_then(|element| element.value().attr(attr))
        .and_then(normalize_text))
}

/// Trims, collapses whitespace and drops control characters
fn normalize_text(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
