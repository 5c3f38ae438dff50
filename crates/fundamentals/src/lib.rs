#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial statement ingestion and normalization.
//!
//! This crate re-exports the core types, the per-ticker
//! [`StatementResolver`] and the source implementations enabled by features.
//!
//! # Features
//!
//! - `fmp` - Financial Modeling Prep JSON API
//! - `yahoo` - Yahoo Finance static and rendered pages
//!
//! # Example
//!
//! ```rust,ignore
//! #[tokio::main]
//! async fn main() -> fundamentals::Result<()> {
//!     let mut aapl = fundamentals::fmp("AAPL");
//!
//!     let balance_sheet = aapl.balance_sheet().await?;
//!     println!("{:?}", balance_sheet.to_dataframe()?);
//!
//!     let market_cap = aapl.profile_value("mktCap").await?;
//!     println!("market cap: {market_cap}");
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use fundamentals_core::*;

// Caching
pub use fundamentals_cache::{CacheEntry, StatementResolver, StatementSlots};

// Sources
#[cfg(feature = "fmp")]
pub use fundamentals_fmp::FmpProvider;
#[cfg(feature = "yahoo")]
pub use fundamentals_yahoo::{BrowserLauncher, BrowserOptions, BrowserSession, YahooProvider};

/// Resolver for `symbol` backed by FMP, configured from the environment.
#[cfg(feature = "fmp")]
pub fn fmp(symbol: impl Into<Symbol>) -> StatementResolver<FmpProvider> {
    StatementResolver::new(symbol, FmpProvider::from_env())
}

/// Resolver for `symbol` backed by the static Yahoo Finance pages.
#[cfg(feature = "yahoo")]
pub fn yahoo(symbol: impl Into<Symbol>) -> StatementResolver<YahooProvider> {
    StatementResolver::new(symbol, YahooProvider::new())
}
