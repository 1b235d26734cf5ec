//! Runs the collector and the extractor back to back and assembles the
//! result table.

use crate::browser::PageRenderer;
use crate::models::ResultTable;
use crate::scrapers::article::ArticleExtractor;
use crate::scrapers::links::LinkCollector;
use tracing::{info, instrument};

/// Collect links with `renderer`, release it, then extract every article.
///
/// The renderer is consumed: it is shut down as soon as link collection
/// finishes, before any article is fetched.
#[instrument(level = "info", skip_all, fields(base = %collector.base()))]
pub async fn scrape<R: PageRenderer>(
    collector: &LinkCollector,
    mut renderer: R,
    extractor: &ArticleExtractor,
) -> ResultTable {
    let links = collector.collect(&mut renderer).await;
    renderer.shutdown();

    let urls: Vec<String> = links.into_iter().collect();
    let records = extractor.fetch_articles(&urls).await;
    let table = ResultTable::from_records(records);

    info!(links = urls.len(), rows = table.len(), "Assembled result table");
    table
}
