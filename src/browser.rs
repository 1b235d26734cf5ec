//! Headless browser access for JavaScript-rendered listing pages.
//!
//! The link collector only needs three capabilities from a browser: load a
//! URL, wait until a readiness selector appears, and hand back the rendered
//! HTML. [`PageRenderer`] captures exactly that, so the collector can be
//! driven by Chrome in production and by canned HTML in tests.
//!
//! [`ChromeRenderer`] owns the Chrome process. It is acquired once per run
//! and released by [`PageRenderer::shutdown`], which consumes it; dropping
//! it on an unwinding path also terminates the browser.

use crate::config::BrowserConfig;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Chrome is killed after this long without any DevTools traffic.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(600);

/// Errors surfaced by a [`PageRenderer`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// The page (or the readiness element) did not show up in time.
    #[error("timed out after {timeout:?} waiting for {waiting_for}")]
    Timeout {
        waiting_for: String,
        timeout: Duration,
    },

    /// The browser session itself failed and cannot be trusted any more.
    #[error("browser driver failure: {0}")]
    Driver(String),

    /// The blocking render task could not be joined.
    #[error("render task failed: {0}")]
    Task(String),
}

impl RenderError {
    /// Whether the whole collection run must stop rather than skip a page.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::Driver(_))
    }
}

/// Something that can turn a URL into rendered HTML.
pub trait PageRenderer {
    /// Load `url`, wait up to `timeout` for an element matching
    /// `ready_selector`, then return the rendered document.
    async fn render(
        &mut self,
        url: &str,
        ready_selector: &str,
        timeout: Duration,
    ) -> Result<String, RenderError>;

    /// Release the session. Consuming `self` guarantees it happens once.
    fn shutdown(self)
    where
        Self: Sized,
    {
    }
}

/// A single headless Chrome session with one reusable tab.
pub struct ChromeRenderer {
    // Held so the Chrome process lives as long as the renderer.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeRenderer {
    /// Launch Chrome and open the tab used for every page load.
    #[instrument(level = "info", skip_all, fields(headless = config.headless))]
    pub fn launch(config: &BrowserConfig) -> Result<Self, RenderError> {
        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={ua}"));

        let mut args: Vec<&OsStr> = vec![
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-blink-features=AutomationControlled"),
        ];
        if let Some(ref ua) = user_agent_arg {
            args.push(OsStr::new(ua));
        }

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .window_size(Some((config.window_width, config.window_height)))
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .args(args)
            .build()
            .map_err(|e| RenderError::Driver(format!("invalid launch options: {e}")))?;

        let browser = Browser::new(options)
            .map_err(|e| RenderError::Driver(format!("failed to launch chrome: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Driver(format!("failed to open tab: {e}")))?;

        info!("Headless browser started");
        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl PageRenderer for ChromeRenderer {
    #[instrument(level = "debug", skip(self))]
    async fn render(
        &mut self,
        url: &str,
        ready_selector: &str,
        timeout: Duration,
    ) -> Result<String, RenderError> {
        let tab = Arc::clone(&self.tab);
        let url = url.to_string();
        let selector = ready_selector.to_string();

        tokio::task::spawn_blocking(move || load_and_read(&tab, &url, &selector, timeout))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }

    fn shutdown(self) {
        drop(self);
        info!("Headless browser closed");
    }
}

fn load_and_read(
    tab: &Tab,
    url: &str,
    selector: &str,
    timeout: Duration,
) -> Result<String, RenderError> {
    tab.set_default_timeout(timeout);
    tab.navigate_to(url)
        .map_err(|e| RenderError::Driver(format!("navigation to {url} failed: {e}")))?;
    tab.wait_until_navigated().map_err(|e| RenderError::Timeout {
        waiting_for: format!("navigation to {url} ({e})"),
        timeout,
    })?;

    wait_for_selector(tab, selector, timeout)?;

    let html = tab
        .get_content()
        .map_err(|e| RenderError::Driver(format!("failed to read page source: {e}")))?;
    debug!(bytes = html.len(), "Read rendered HTML");
    Ok(html)
}

/// Poll the DOM until `selector` matches or `timeout` elapses.
fn wait_for_selector(tab: &Tab, selector: &str, timeout: Duration) -> Result<(), RenderError> {
    let script = format!(
        "document.querySelector('{}') !== null",
        selector.replace('\'', "\\'")
    );
    let start = Instant::now();

    loop {
        let ready = tab
            .evaluate(&script, false)
            .ok()
            .and_then(|result| result.value)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        if ready {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(RenderError::Timeout {
                waiting_for: format!("selector {selector:?}"),
                timeout,
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
