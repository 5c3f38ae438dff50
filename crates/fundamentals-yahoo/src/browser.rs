//! Rendered-page boundary.
//!
//! Rendered statement pages are only complete after their scripts run, so
//! they are read through a browser session rather than a plain HTTP client.
//! This crate does not drive a browser itself: callers implement
//! [`BrowserLauncher`] and [`BrowserSession`] on top of their WebDriver or
//! CDP client of choice.

use std::fmt::Debug;
use std::path::PathBuf;

use async_trait::async_trait;
use fundamentals_core::{Result, StatementTable};
use tracing::{debug, warn};

use crate::rendered::rendered_table;

/// Environment variable naming the WebDriver binary.
pub const DRIVER_PATH_ENV: &str = "CHROMEDRIVER_PATH";

/// Environment variable toggling headless mode (`0`/`false` to disable).
pub const HEADLESS_ENV: &str = "HEADLESS";

/// Elements holding the header cells of a rendered statement.
pub const HEADER_SELECTOR: &str =
    "#Col1-1-Financials-Proxy section > div:nth-of-type(4) div.D\\(tbhg\\) > div > div";

/// Elements holding one expanded statement row each.
pub const ROW_SELECTOR: &str = ".rw-expnded";

/// Options handed to a [`BrowserLauncher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Run without a visible window.
    pub headless: bool,
    /// WebDriver binary, if not on `PATH`.
    pub driver_path: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            driver_path: None,
        }
    }
}

impl BrowserOptions {
    /// Reads options from `CHROMEDRIVER_PATH` and `HEADLESS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(DRIVER_PATH_ENV).ok(),
            std::env::var(HEADLESS_ENV).ok(),
        )
    }

    fn from_vars(driver_path: Option<String>, headless: Option<String>) -> Self {
        let headless = headless.is_none_or(|value| {
            !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no")
        });
        Self {
            headless,
            driver_path: driver_path.filter(|p| !p.is_empty()).map(PathBuf::from),
        }
    }
}

/// One live browser session.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates to `url` and waits for the page to load.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Visible text of every element matching a CSS selector, in page order.
    async fn texts(&mut self, selector: &str) -> Result<Vec<String>>;

    /// Ends the session.
    async fn close(&mut self) -> Result<()>;
}

/// Starts browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync + Debug {
    /// Starts a new session.
    async fn launch(&self, options: &BrowserOptions) -> Result<Box<dyn BrowserSession>>;
}

/// Loads a rendered statement page and builds its table.
///
/// The session is closed on every path once launched. A close failure after
/// a successful load fails the call; after a failed load it is only logged
/// and the load error is returned.
pub async fn scrape_rendered(
    launcher: &dyn BrowserLauncher,
    options: &BrowserOptions,
    url: &str,
) -> Result<StatementTable> {
    let mut session = launcher.launch(options).await?;
    let loaded = load_table(session.as_mut(), url).await;
    let closed = session.close().await;

    match (loaded, closed) {
        (Ok(table), Ok(())) => Ok(table),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close)) => {
            warn!(url, error = %close, "Failed to close browser session");
            Err(e)
        }
    }
}

async fn load_table(session: &mut dyn BrowserSession, url: &str) -> Result<StatementTable> {
    session.goto(url).await?;

    let header: Vec<String> = session
        .texts(HEADER_SELECTOR)
        .await?
        .into_iter()
        .filter(|text| !text.trim().is_empty())
        .collect();
    let rows = session.texts(ROW_SELECTOR).await?;
    debug!(url, header = header.len(), rows = rows.len(), "Loaded rendered page");

    rendered_table(&header, &rows)
}
