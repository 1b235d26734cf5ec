//! Article page fetching and field extraction.
//!
//! Article pages are static HTML, so a plain `reqwest` GET is enough. Each
//! field is pulled out by a [`FieldCascade`]: an ordered list of
//! [`Strategy`] values tried in turn, the first non-empty result winning.
//! A field nobody matches becomes [`NOT_AVAILABLE`] and is logged, but the
//! record is still produced. Only a failed fetch drops the article.
//!
//! | Field | Strategies, in order |
//! |-------|----------------------|
//! | title | first `h1` |
//! | author | `.c-article-byline__name`, `meta[name=author]`, byline `span`, byline `a.u-hover-underline` |
//! | publication_date | first `time`'s `datetime`, `article:published_time` meta, `pubdate` meta, `span.c-article-byline__date` |
//! | content | `div.c-article-content > p`, `div.c-article__body p`, first `article`'s `p` |

use crate::config::ScrapeConfig;
use crate::models::{ArticleRecord, NOT_AVAILABLE};
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

static PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("paragraph selector is valid"));

/// Why an article page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("server responded with {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e)
        } else {
            FetchError::Request(e)
        }
    }
}

/// How a strategy turns its matched element(s) into a value.
#[derive(Debug, Clone, Copy)]
enum Extract {
    /// Text of the first match.
    Text,
    /// Named attribute of the first match.
    Attr(&'static str),
    /// Text of every match, one per line.
    AllText,
    /// Every `<p>` descendant of the first match, one per line.
    Paragraphs,
}

/// One way of finding a field in a document.
#[derive(Debug)]
pub struct Strategy {
    selector: Selector,
    extract: Extract,
}

impl Strategy {
    fn new(css: &str, extract: Extract) -> Self {
        let selector =
            Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"));
        Self { selector, extract }
    }

    /// Trimmed text of the first element matching `css`.
    pub fn text(css: &str) -> Self {
        Self::new(css, Extract::Text)
    }

    /// Attribute `name` of the first element matching `css`. A first match
    /// without the attribute is a miss; later matches are not consulted.
    pub fn attr(css: &str, name: &'static str) -> Self {
        Self::new(css, Extract::Attr(name))
    }

    pub fn all_text(css: &str) -> Self {
        Self::new(css, Extract::AllText)
    }

    pub fn paragraphs_within(css: &str) -> Self {
        Self::new(css, Extract::Paragraphs)
    }

    /// Run this strategy; `None` when nothing (or only whitespace) matched.
    pub fn apply(&self, document: &Html) -> Option<String> {
        let value = match self.extract {
            Extract::Text => element_text(&document.select(&self.selector).next()?),
            Extract::Attr(name) => document
                .select(&self.selector)
                .next()?
                .value()
                .attr(name)?
                .trim()
                .to_string(),
            Extract::AllText => join_lines(document.select(&self.selector)),
            Extract::Paragraphs => {
                let scope = document.select(&self.selector).next()?;
                join_lines(scope.select(&PARAGRAPH))
            }
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Ordered fallbacks for a single field.
#[derive(Debug)]
pub struct FieldCascade {
    field: &'static str,
    strategies: Vec<Strategy>,
}

impl FieldCascade {
    pub fn new(field: &'static str, strategies: Vec<Strategy>) -> Self {
        Self { field, strategies }
    }

    /// First strategy that matches, if any.
    pub fn find(&self, document: &Html) -> Option<String> {
        self.strategies.iter().find_map(|s| s.apply(document))
    }

    /// Like [`find`](Self::find) but falls back to [`NOT_AVAILABLE`],
    /// logging a warning for `url`.
    pub fn extract(&self, document: &Html, url: &str) -> String {
        self.find(document).unwrap_or_else(|| {
            warn!(%url, field = self.field, "Field not found using any selector");
            NOT_AVAILABLE.to_string()
        })
    }
}

static TITLE: Lazy<FieldCascade> =
    Lazy::new(|| FieldCascade::new("title", vec![Strategy::text("h1")]));

static AUTHOR: Lazy<FieldCascade> = Lazy::new(|| {
    FieldCascade::new(
        "author",
        vec![
            Strategy::text(".c-article-byline__name"),
            Strategy::attr(r#"meta[name="author"]"#, "content"),
            Strategy::text("div.c-article-byline span.c-article-byline__name"),
            Strategy::text("div.c-article-byline a.u-hover-underline"),
        ],
    )
});

static PUBLICATION_DATE: Lazy<FieldCascade> = Lazy::new(|| {
    FieldCascade::new(
        "publication_date",
        vec![
            // Only the first <time>; without `datetime` it falls through to the meta tags.
            Strategy::attr("time", "datetime"),
            Strategy::attr(r#"meta[property="article:published_time"]"#, "content"),
            Strategy::attr(r#"meta[name="pubdate"]"#, "content"),
            Strategy::text("span.c-article-byline__date"),
        ],
    )
});

static CONTENT: Lazy<FieldCascade> = Lazy::new(|| {
    FieldCascade::new(
        "content",
        vec![
            Strategy::all_text("div.c-article-content > p"),
            Strategy::paragraphs_within("div.c-article__body"),
            Strategy::paragraphs_within("article"),
        ],
    )
});

/// Whitespace-trimmed text of an element, inner text nodes joined by spaces.
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .join(" ")
}

/// Text of each element on its own line, skipping empty ones.
fn join_lines<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .map(|el| element_text(&el))
        .filter(|s| !s.is_empty())
        .join("\n")
}

/// Build a record from an already-fetched article page.
pub fn extract_record(url: &str, html: &str) -> ArticleRecord {
    let document = Html::parse_document(html);
    let record = ArticleRecord {
        url: url.to_string(),
        title: TITLE.extract(&document, url),
        author: AUTHOR.extract(&document, url),
        publication_date: PUBLICATION_DATE.extract(&document, url),
        content: CONTENT.extract(&document, url),
    };
    debug!(
        %url,
        missing = record.missing_fields(),
        content_bytes = record.content.len(),
        "Extracted article fields"
    );
    record
}

/// Fetches article pages one at a time and extracts their fields.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    client: Client,
    delay: Duration,
}

impl ArticleExtractor {
    /// Extractor whose requests time out after `timeout`, pausing `delay`
    /// after each article.
    pub fn new(timeout: Duration, delay: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(client, delay))
    }

    /// Extractor using `article_timeout` and `article_delay` from `config`.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.article_timeout(), config.article_delay())
    }

    /// Extractor around a preconfigured `client`.
    ///
    /// # Arguments
    ///
    /// * `client` - used for every article GET; its timeout applies per request
    /// * `delay` - pause after each article, fetched or not
    pub fn with_client(client: Client, delay: Duration) -> Self {
        Self { client, delay }
    }

    /// Fetch every URL in order. Failed URLs are logged and left out.
    #[instrument(level = "info", skip_all, fields(count = urls.len()))]
    pub async fn fetch_articles(&self, urls: &[String]) -> Vec<ArticleRecord> {
        let total = urls.len();
        info!(total, "Starting article content scraping");

        let mut records = Vec::with_capacity(total);
        for (i, url) in urls.iter().enumerate() {
            info!(index = i + 1, total, %url, "Processing article link");
            if let Some(record) = self.fetch_article(url).await {
                records.push(record);
            }
            sleep(self.delay).await;
        }

        info!(
            fetched = records.len(),
            skipped = total - records.len(),
            "Finished article content scraping"
        );
        records
    }

    /// Fetch and extract one article; `None` if the page could not be fetched.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_article(&self, url: &str) -> Option<ArticleRecord> {
        match self.fetch_html(url).await {
            Ok(html) => Some(extract_record(url, &html)),
            Err(FetchError::Timeout(e)) => {
                error!(%url, error = %e, "Timed out fetching article; skipping");
                None
            }
            Err(e) => {
                error!(%url, error = %e, "Failed to fetch article; skipping");
                None
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched article page");
        Ok(body)
    }
}
