//! # Euronews Scraper
//!
//! Collects article links from a JavaScript-rendered, paginated news
//! listing and extracts a small table of title, author, publication date
//! and body text from every article.
//!
//! ## Usage
//!
//! ```sh
//! euronews_scraper --max-pages 2 -j ./json
//! ```
//!
//! ## Architecture
//!
//! The run is a strictly sequential pipeline:
//! 1. **Indexing**: render listing pages in headless Chrome and harvest
//!    dated article links (the browser is closed afterwards)
//! 2. **Fetching**: GET each article and extract fields through selector
//!    fallbacks
//! 3. **Output**: print a preview of the table, optionally write JSON
//!
//! Failures never crash the run: skipped pages and articles are logged,
//! and whatever was gathered is reported.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod config;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
#[cfg(test)]
mod testing;
mod utils;

use browser::ChromeRenderer;
use cli::Cli;
use config::ScrapeConfig;
use outputs::{json, preview};
use scrapers::article::ArticleExtractor;
use scrapers::links::LinkCollector;

#[tokio::main]
async fn main() {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("euronews_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if let Err(e) = run(&args).await {
        error!(error = %e, "A critical error occurred during the scraping process");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
}

#[instrument(level = "info", skip_all)]
async fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    let config = ScrapeConfig::resolve(args)?;
    info!(
        base_url = %config.base_url,
        max_pages = config.max_pages,
        "Configuration resolved"
    );

    let collector = LinkCollector::from_config(&config)?;
    let extractor = ArticleExtractor::from_config(&config)?;
    let renderer = ChromeRenderer::launch(&config.browser)?;

    let table = pipeline::scrape(&collector, renderer, &extractor).await;

    if table.is_empty() {
        warn!("No article data was successfully scraped to create a table");
    } else {
        info!(rows = table.len(), "Successfully created result table");
        println!("{}", preview::render(&table, config.preview_rows));
    }

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_table(&table, &config.base_url, dir).await {
            error!(error = %e, "Failed to write JSON snapshot");
        }
    }

    Ok(())
}
