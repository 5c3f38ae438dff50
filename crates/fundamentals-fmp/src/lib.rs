#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Modeling Prep (FMP) statement source.
//!
//! This crate implements [`StatementSource`] for the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API. Each
//! statement endpoint returns one JSON object per period; [`normalize_records`]
//! transposes them into a [`StatementTable`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use fundamentals_fmp::FmpProvider;
//! use fundamentals_core::{StatementKind, StatementSource, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FmpProvider::from_env();
//!     let symbol = Symbol::new("AAPL");
//!
//!     let balance_sheet = provider
//!         .fetch_statement(&symbol, StatementKind::BalanceSheet)
//!         .await?;
//!     println!("{:?}", balance_sheet.to_dataframe()?);
//!
//!     let profile = provider.fetch_profile(&symbol).await?;
//!     println!("market cap: {}", profile.value("mktCap")?);
//!
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use fundamentals_core::{
    DataError, DataProvider, Profile, Result, StatementKind, StatementSource, StatementTable,
    Symbol,
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

pub mod normalize;

pub use normalize::{DATE_FIELD, normalize_records};

/// Base URL for the FMP v3 API.
pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Public API key accepted by FMP for a handful of tickers.
pub const DEMO_API_KEY: &str = "demo";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "FMP_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "FMP_BASE_URL";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const PROVIDER_NAME: &str = "FMP";

/// Endpoint serving each statement kind.
/// Endpoint serving company profiles.
const PROFILE_ENDPOINT: &str = "company/profile";

/// Financial Modeling Prep statement source.
///
/// Provides access to:
/// - Balance sheets, income statements, cash flow statements
/// - Company profiles (market cap, beta, price, ...)
#[derive(Clone)]
pub struct FmpProvider {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for FmpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FmpProvider {
    /// Create a new FMP provider with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new FMP provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a provider configured from `FMP_API_KEY` and `FMP_BASE_URL`.
    ///
    /// Falls back to the public demo key and the v3 base URL.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_else(|_| DEMO_API_KEY.to_string());
        let provider = Self::new(api_key);
        match std::env::var(BASE_URL_ENV) {
            Ok(base_url) => provider.with_base_url(base_url),
            Err(_) => provider,
        }
    }

    /// Point the provider at a different API root.
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

    /// Build a URL with the API key appended.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{}/{endpoint}&apikey={}", self.base_url, self.api_key)
        } else {
            format!("{}/{endpoint}?apikey={}", self.base_url, self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get(&self, endpoint: &str) -> Result<Value> {
        let url = self.url(endpoint);
        debug!("FMP request: {}", endpoint);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: None,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Transport(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await.map_err(transport_error)?;

        // Check for FMP error responses
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(DataError::Transport(text));
        }

        serde_json::from_str(&text).map_err(|e| DataError::format(format!("{e}: {text}")))
    }
}

/// Endpoint path for a statement kind.
#[must_use]
pub const fn statement_endpoint(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::BalanceSheet => "financials/balance-sheet-statement",
        StatementKind::IncomeStatement => "financials/income-statement",
        StatementKind::CashFlow => "financials/cash-flow-statement",
    }
}

fn transport_error(e: reqwest::Error) -> DataError {
    if e.is_timeout() {
        DataError::Transport(format!("request timed out: {e}"))
    } else {
        DataError::Transport(e.to_string())
    }
}

fn empty(what: impl fmt::Display) -> DataError {
    DataError::EmptySource {
        source_name: PROVIDER_NAME.to_string(),
        what: what.to_string(),
    }
}

/// Extracts the period records from a statement response.
///
/// Accepts the v3 envelope (`{"symbol": ..., "financials": [...]}`) as well
/// as a bare array of records.
pub fn statement_records(body: &Value, kind: StatementKind) -> Result<&[Value]> {
    let records = match body {
        Value::Array(records) => Some(records.as_slice()),
        Value::Object(envelope) => envelope
            .get("financials")
            .and_then(Value::as_array)
            .map(Vec::as_slice),
        _ => None,
    };

    match records {
        Some(records) if !records.is_empty() => Ok(records),
        _ => Err(empty(kind)),
    }
}

/// Extracts the profile object from a profile response.
///
/// Accepts the v3 envelope (`{"symbol": ..., "profile": {...}}`) as well as
/// an array whose first element is the profile.
pub fn profile_object(body: &Value) -> Result<Profile> {
    let object = match body {
        Value::Array(profiles) => profiles.first(),
        Value::Object(envelope) => envelope.get("profile"),
        _ => None,
    };

    match object {
        Some(object) if object.as_object().is_some_and(|fields| !fields.is_empty()) => {
            Profile::from_json(object)
        }
        _ => Err(empty("profile")),
    }
}

impl DataProvider for FmpProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Financial Modeling Prep - Financial statements and company profiles"
    }
}

#[async_trait]
impl StatementSource for FmpProvider {
    #[instrument(skip(self), fields(provider = PROVIDER_NAME, symbol = %symbol, kind = %kind))]
    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
    ) -> Result<StatementTable> {
        let endpoint = format!("{}/{}", statement_endpoint(kind), symbol.as_str());
        let body = self.get(&endpoint).await?;
        let records = statement_records(&body, kind)?;
        normalize_records(records, DATE_FIELD)
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME, symbol = %symbol))]
    async fn fetch_profile(&self, symbol: &Symbol) -> Result<Profile> {
        let endpoint = format!("{PROFILE_ENDPOINT}/{}", symbol.as_str());
        let body = self.get(&endpoint).await?;
        profile_object(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_building() {
        let provider = FmpProvider::new("test_key");
        assert_eq!(
            provider.url("financials/income-statement/AAPL"),
            "https://financialmodelingprep.com/api/v3/financials/income-statement/AAPL?apikey=test_key"
        );
        assert_eq!(
            provider.url("quote?symbol=AAPL"),
            "https://financialmodelingprep.com/api/v3/quote?symbol=AAPL&apikey=test_key"
        );
    }

    #[test]
    fn test_base_url_override() {
        let provider = FmpProvider::new("k").with_base_url("http://localhost:8080/v3/");
        assert_eq!(
            provider.url("company/profile/AAPL"),
            "http://localhost:8080/v3/company/profile/AAPL?apikey=k"
        );
    }

    #[test]
    fn test_every_kind_has_an_endpoint() {
        for kind in StatementKind::ALL {
            assert!(statement_endpoint(kind).starts_with("financials/"));
        }
        assert_eq!(
            statement_endpoint(StatementKind::BalanceSheet),
            "financials/balance-sheet-statement"
        );
        assert_eq!(
            statement_endpoint(StatementKind::IncomeStatement),
            "financials/income-statement"
        );
        assert_eq!(
            statement_endpoint(StatementKind::CashFlow),
            "financials/cash-flow-statement"
        );
    }

    #[test]
    fn test_provider_metadata() {
        let provider = FmpProvider::new("test_key");
        assert_eq!(provider.name(), "FMP");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = FmpProvider::new("secret_key_12345");
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_statement_envelope() {
        let body = json!({
            "symbol": "AAPL",
            "financials": [
                {"date": "2019-09-28", "Total assets": "338516000000.0"},
                {"date": "2018-09-29", "Total assets": "365725000000.0"}
            ]
        });
        let records = statement_records(&body, StatementKind::BalanceSheet).unwrap();
        let table = normalize_records(records, DATE_FIELD).unwrap();
        assert_eq!(
            table.row("Total assets"),
            Some(&[338_516_000_000.0, 365_725_000_000.0][..])
        );
    }

    #[test]
    fn test_empty_statement_response() {
        for body in [json!({}), json!([]), json!({"financials": []}), json!("nope")] {
            let err = statement_records(&body, StatementKind::CashFlow).unwrap_err();
            assert!(matches!(err, DataError::EmptySource { .. }));
        }
    }

    #[test]
    fn test_profile_envelope() {
        let body = json!({
            "symbol": "AAPL",
            "profile": {"price": 232.57, "mktCap": "1230468047640.00", "companyName": "Apple Inc."}
        });
        let profile = profile_object(&body).unwrap();
        assert_eq!(profile.value("mktCap").unwrap(), 1_230_468_047_640.0);
        assert_eq!(profile.value("lastDiv").unwrap(), 0.0);

        let body = json!([{"mktCap": 10.0}]);
        assert_eq!(profile_object(&body).unwrap().value("mktCap").unwrap(), 10.0);

        assert!(matches!(
            profile_object(&json!({})),
            Err(DataError::EmptySource { .. })
        ));
    }
}
