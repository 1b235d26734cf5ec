//! Runtime configuration for the scraper.
//!
//! Every threshold the pipeline uses (page count, delays, timeouts) lives in
//! [`ScrapeConfig`]. Each field has a documented default, so an empty YAML
//! file (or no file at all) yields a working configuration. Command-line
//! flags are layered on top by [`ScrapeConfig::apply_cli`].
//!
//! # Example
//!
//! ```yaml
//! base_url: "https://www.euronews.com/"
//! max_pages: 3
//! page_delay_secs: 2
//! browser:
//!   headless: true
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

/// Default listing page the collector starts from.
pub const DEFAULT_BASE_URL: &str = "https://www.euronews.com/";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid base url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Top-level scraper configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Listing page that is paginated with `?page=N`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on listing pages visited.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Pause between consecutive listing page loads.
    #[serde(default = "default_page_delay")]
    pub page_delay_secs: u64,

    /// How long to wait for the rendered listing page to become ready.
    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    /// Pause after every article fetch, successful or not.
    #[serde(default = "default_article_delay")]
    pub article_delay_secs: u64,

    /// Timeout for a single article GET.
    #[serde(default = "default_article_timeout")]
    pub article_timeout_secs: u64,

    /// Rows shown in the console preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Headless browser launch settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_pages() -> usize {
    5
}

fn default_page_delay() -> u64 {
    5
}

fn default_page_load_timeout() -> u64 {
    45
}

fn default_article_delay() -> u64 {
    1
}

fn default_article_timeout() -> u64 {
    20
}

fn default_preview_rows() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_pages: default_max_pages(),
            page_delay_secs: default_page_delay(),
            page_load_timeout_secs: default_page_load_timeout(),
            article_delay_secs: default_article_delay(),
            article_timeout_secs: default_article_timeout(),
            preview_rows: default_preview_rows(),
            browser: BrowserConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: None,
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml(&raw)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Build the effective configuration: defaults, then the optional config
    /// file, then command-line overrides.
    ///
    /// # Arguments
    ///
    /// * `cli` - parsed command line; `--config` names the YAML file
    ///
    /// # Returns
    ///
    /// The validated configuration, or a [`ConfigError`] if the file cannot
    /// be read or parsed, or the base URL is not an absolute URL.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match cli.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Overlay values given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(max_pages) = cli.max_pages {
            self.max_pages = max_pages;
        }
        if let Some(rows) = cli.preview_rows {
            self.preview_rows = rows;
        }
    }

    /// Ensure the base URL parses as an absolute URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base()?;
        Ok(())
    }

    /// The parsed base URL.
    pub fn base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    /// Pause between listing pages.
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }

    /// Readiness wait per listing page.
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    /// Pause after each article fetch.
    pub fn article_delay(&self) -> Duration {
        Duration::from_secs(self.article_delay_secs)
    }

    /// Per-request timeout for article fetches.
    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }
}
