#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance statement source.
//!
//! This crate implements [`StatementSource`] on top of the Yahoo Finance
//! website. Statements come from one of two page flavours:
//!
//! - static pages, a plain HTML `<table>` read with [`table::extract_table`]
//! - rendered pages, read through a caller-supplied [`BrowserLauncher`] and
//!   split apart by the [`decompose`] module
//!
//! Company profiles always come from the static quote summary page.
//!
//! # Example
//!
//! ```no_run
//! use fundamentals_yahoo::YahooProvider;
//! use fundamentals_core::{StatementKind, StatementSource, Symbol};
//!
//! # async fn example() -> fundamentals_core::Result<()> {
//! let provider = YahooProvider::new();
//! let symbol = Symbol::new("AAPL");
//!
//! let income = provider
//!     .fetch_statement(&symbol, StatementKind::IncomeStatement)
//!     .await?;
//! println!("{:?}", income.to_dataframe()?);
//!
//! let profile = provider.fetch_profile(&symbol).await?;
//! println!("market cap: {}", profile.value("Market Cap")?);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fundamentals_core::{
    DataError, DataProvider, Profile, Result, StatementKind, StatementSource, StatementTable,
    Symbol,
};
use reqwest::header::USER_AGENT as USER_AGENT_HEADER;
use tracing::{debug, instrument};

pub mod browser;
pub mod decompose;
pub mod rendered;
pub mod table;

pub use browser::{BrowserLauncher, BrowserOptions, BrowserSession, scrape_rendered};
pub use decompose::{LeafRecord, decompose_row};
pub use rendered::{HeaderColumn, RenderedHeader, rendered_table};
pub use table::{extract_summary, extract_table, parse_document, sentinel};

/// Yahoo Finance website root.
pub const YAHOO_BASE_URL: &str = "https://finance.yahoo.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Page slug serving a statement kind.
#[must_use]
pub const fn page_slug(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::BalanceSheet => "balance-sheet",
        StatementKind::IncomeStatement => "financials",
        StatementKind::CashFlow => "cash-flow",
    }
}

/// Yahoo Finance statement source.
///
/// Without a browser launcher every statement is read from its static page.
/// With one, statements are read from rendered pages instead.
#[derive(Clone, Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    browser: Option<Arc<dyn BrowserLauncher>>,
    browser_options: BrowserOptions,
}

impl YahooProvider {
    /// Create a provider reading static pages.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: YAHOO_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            browser: None,
            browser_options: BrowserOptions::default(),
        }
    }

    /// Read statements from rendered pages through `launcher`.
    #[must_use]
    pub fn with_browser(mut self, launcher: Arc<dyn BrowserLauncher>) -> Self {
        self.browser = Some(launcher);
        self
    }

    /// Options passed to the browser launcher.
    #[must_use]
    pub fn with_browser_options(mut self, options: BrowserOptions) -> Self {
        self.browser_options = options;
        self
    }

    /// Point the provider at a different site root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the static statement page for `symbol`.
    #[must_use]
    pub fn statement_url(&self, symbol: &Symbol, kind: StatementKind) -> String {
        format!("{}/quote/{symbol}/{}", self.base_url, page_slug(kind))
    }

    /// URL the browser visits for a rendered statement page.
    #[must_use]
    pub fn rendered_url(&self, symbol: &Symbol, kind: StatementKind) -> String {
        format!("{}?p={symbol}", self.statement_url(symbol, kind))
    }

    /// URL of the quote summary page for `symbol`.
    #[must_use]
    pub fn summary_url(&self, symbol: &Symbol) -> String {
        format!("{}/quote/{symbol}", self.base_url)
    }

    /// Fetch a static page as text.
    async fn get_page(&self, symbol: &Symbol, url: &str) -> Result<String> {
        debug!("Yahoo request: {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: Some(Duration::from_secs(60)),
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        if !response.status().is_success() {
            return Err(DataError::Transport(format!(
                "HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        response.text().await.map_err(transport_error)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a statement table from the HTML of a static statement page.
pub fn statement_from_html(html: &str, kind: StatementKind) -> Result<StatementTable> {
    let rows = parse_document(html)?;
    extract_table(&rows, sentinel(kind))
}

/// Builds a profile from the HTML of a quote summary page.
pub fn profile_from_html(html: &str) -> Result<Profile> {
    let rows = parse_document(html)?;
    extract_summary(&rows)
}

fn transport_error(e: reqwest::Error) -> DataError {
    if e.is_timeout() {
        DataError::Transport(format!("request timed out: {e}"))
    } else {
        DataError::Transport(e.to_string())
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Yahoo Finance - Financial statements and quote summaries scraped from the website"
    }
}

#[async_trait]
impl StatementSource for YahooProvider {
    #[instrument(skip(self), fields(provider = PROVIDER_NAME, symbol = %symbol, kind = %kind))]
    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
    ) -> Result<StatementTable> {
        match &self.browser {
            Some(launcher) => {
                let url = self.rendered_url(symbol, kind);
                scrape_rendered(launcher.as_ref(), &self.browser_options, &url).await
            }
            None => {
                let url = self.statement_url(symbol, kind);
                let html = self.get_page(symbol, &url).await?;
                statement_from_html(&html, kind)
            }
        }
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME, symbol = %symbol))]
    async fn fetch_profile(&self, symbol: &Symbol) -> Result<Profile> {
        let url = self.summary_url(symbol);
        let html = self.get_page(symbol, &url).await?;
        profile_from_html(&html)
    }
}
