//! Listing-page link collection.
//!
//! The listing site is rendered client-side, so every page goes through a
//! [`PageRenderer`]. From the rendered HTML we pick "article container"
//! elements by class-name heuristics and keep only the links inside them
//! that look like dated article permalinks, e.g.
//! `https://www.euronews.com/2025/05/06/some-article-slug`.
//!
//! # Pagination
//!
//! Page 0 is the base URL, page `N` is the base URL with `?page=N`. The walk
//! stops early when a page has no article containers or when a page after
//! the first adds no new links. Both are treated as "end of pagination", so
//! a page that only repeats already-seen (e.g. pinned) articles also ends
//! the walk.

use crate::browser::{PageRenderer, RenderError};
use crate::config::{ConfigError, ScrapeConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Substrings of a resolved URL that mark non-article sections.
pub const EXCLUDED_PATTERNS: [&str; 9] = [
    "/tag/",
    "/my-europe/",
    "/video/",
    "/culture/",
    "/green/",
    "/programs/",
    "/live",
    "/widgets",
    "/business/markets",
];

/// Class-name fragments that identify an article container.
pub const CONTAINER_CLASS_MARKERS: [&str; 4] = ["article", "media", "headline", "c-article-tile"];

/// Element whose presence means the listing page has rendered.
const READY_SELECTOR: &str = "body";

static DATE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d{4}/\d{2}/\d{2}/").expect("date path pattern is valid"));

static CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article[class], div[class], section[class]")
        .expect("container selector is valid")
});

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("link selector is valid"));

/// URL of listing page `page`.
pub fn page_url(base: &Url, page: usize) -> Url {
    if page == 0 {
        return base.clone();
    }
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("page", &page.to_string());
    url
}

/// `true` for hrefs rooted at the site (`/path`), excluding the bare root
/// and protocol-relative `//host/...` links.
pub fn is_site_relative(href: &str) -> bool {
    href.len() > 1 && href.starts_with('/') && !href.starts_with("//")
}

/// `true` if the URL falls into one of the [`EXCLUDED_PATTERNS`] sections.
pub fn is_excluded(url: &str) -> bool {
    EXCLUDED_PATTERNS.iter().any(|pattern| url.contains(pattern))
}

/// `true` if the URL carries a `/YYYY/MM/DD/` path segment.
pub fn has_date_path(url: &str) -> bool {
    DATE_PATH.is_match(url)
}

/// `true` if `url` has the same scheme, host and port as `base`.
pub fn is_same_origin(base: &Url, url: &Url) -> bool {
    url.scheme() == base.scheme()
        && url.host_str() == base.host_str()
        && url.port_or_known_default() == base.port_or_known_default()
}

/// Resolve `href` against `base` and return it if it is an article link.
///
/// The origin is checked after resolution: the URL parser reads
/// `\` as `/` and drops tabs and newlines, so `/\host/...` still escapes
/// to another host.
///
/// # Returns
///
/// The absolute URL, or `None` if any filter rejects the link.
pub fn qualifies(base: &Url, href: &str) -> Option<String> {
    if !is_site_relative(href) {
        return None;
    }
    let resolved = base.join(href).ok()?;
    if !is_same_origin(base, &resolved) {
        return None;
    }
    let resolved = resolved.to_string();
    if is_excluded(&resolved) || !has_date_path(&resolved) {
        return None;
    }
    Some(resolved)
}

/// `true` if the element's class attribute mentions a container marker.
fn is_container(element: &ElementRef<'_>) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| CONTAINER_CLASS_MARKERS.iter().any(|m| class.contains(m)))
}

/// What one rendered listing page yielded.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListingScan {
    /// Number of article containers found.
    pub containers: usize,
    /// Qualifying links in document order. May repeat when containers nest
    /// or an article is linked twice.
    pub links: Vec<String>,
}

/// Find article containers in `html` and the qualifying links inside them.
pub fn scan_listing(html: &str, base: &Url) -> ListingScan {
    let document = Html::parse_document(html);
    let mut scan = ListingScan::default();

    for container in document.select(&CONTAINER_SELECTOR).filter(is_container) {
        scan.containers += 1;
        for link in container.select(&LINK_SELECTOR) {
            if let Some(href) = link.value().attr("href") {
                if let Some(url) = qualifies(base, href) {
                    scan.links.push(url);
                }
            }
        }
    }
    scan
}

/// Walks the paginated listing and accumulates unique article URLs.
#[derive(Debug, Clone)]
pub struct LinkCollector {
    base: Url,
    max_pages: usize,
    page_delay: Duration,
    page_load_timeout: Duration,
}

impl LinkCollector {
    /// Collector for the listing at `base`.
    ///
    /// # Arguments
    ///
    /// * `max_pages` - upper bound on listing pages visited, page 0 included
    /// * `page_delay` - pause before every page after the first
    /// * `page_load_timeout` - how long the renderer waits for the page body
    pub fn new(
        base: Url,
        max_pages: usize,
        page_delay: Duration,
        page_load_timeout: Duration,
    ) -> Self {
        Self {
            base,
            max_pages,
            page_delay,
            page_load_timeout,
        }
    }

    /// Collector built from the resolved configuration.
    ///
    /// Fails only if `base_url` does not parse.
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.base()?,
            config.max_pages,
            config.page_delay(),
            config.page_load_timeout(),
        ))
    }

    /// The listing URL every link is resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Collect article links page by page.
    ///
    /// Never fails: page-level problems are logged and skipped, a fatal
    /// browser error ends the walk, and whatever was gathered up to that
    /// point is returned.
    #[instrument(level = "info", skip_all, fields(base = %self.base, max_pages = self.max_pages))]
    pub async fn collect<R: PageRenderer>(&self, renderer: &mut R) -> HashSet<String> {
        let mut links = HashSet::new();
        info!("Starting link collection");

        for page in 0..self.max_pages {
            if page > 0 {
                sleep(self.page_delay).await;
            }

            let url = page_url(&self.base, page);
            info!(%url, page, "Scraping links from listing page");

            let html = match renderer
                .render(url.as_str(), READY_SELECTOR, self.page_load_timeout)
                .await
            {
                Ok(html) => html,
                Err(e) if e.is_fatal() => {
                    error!(%url, error = %e, "Browser session failed; stopping link collection");
                    break;
                }
                Err(e @ RenderError::Timeout { .. }) => {
                    error!(%url, error = %e, "Timed out waiting for page to load; skipping page");
                    continue;
                }
                Err(e) => {
                    error!(
                        %url,
                        error = %e,
                        "Unexpected error while scraping links; skipping page"
                    );
                    continue;
                }
            };

            let scan = scan_listing(&html, &self.base);
            if scan.containers == 0 {
                if page == 0 {
                    error!(
                        %url,
                        "No article containers found on the first page; check site structure"
                    );
                } else {
                    info!(%url, "No article containers found; assuming end of pagination");
                }
                break;
            }

            let mut added = 0usize;
            for link in scan.links {
                if links.insert(link) {
                    added += 1;
                }
            }
            info!(
                %url,
                containers = scan.containers,
                added,
                total = links.len(),
                "Scraped article links from page"
            );

            if added == 0 && page > 0 {
                warn!(%url, "No new article links on page; assuming end of pagination");
                break;
            }
        }

        info!(count = links.len(), "Finished collecting links");
        debug!(urls = ?links, "Collected links");
        links
    }
}
