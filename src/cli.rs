//! Command-line interface definitions.
//!
//! Every flag is optional: with no arguments the scraper runs against the
//! default listing with the documented defaults from [`crate::config`].

use clap::Parser;

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Defaults: five listing pages of euronews.com, console preview only
/// euronews_scraper
///
/// # Two pages, with a JSON snapshot of the result table
/// euronews_scraper --max-pages 2 -j ./json
///
/// # Thresholds from a YAML file
/// euronews_scraper --config scraper.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listing page to collect article links from
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Maximum number of listing pages to visit
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Number of rows shown in the console preview
    #[arg(long)]
    pub preview_rows: Option<usize>,

    /// Directory for an optional JSON snapshot of the result table
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}
