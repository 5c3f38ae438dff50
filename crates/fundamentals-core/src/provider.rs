//! Provider traits for fetching statements.
//!
//! - [`DataProvider`] - Base trait carrying provider metadata
//! - [`StatementSource`] - Fetches and normalizes statements and profiles

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    kind::StatementKind,
    table::StatementTable,
    types::{Profile, Symbol},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "FMP").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// A source that can produce normalized statements for a ticker.
///
/// Each call performs one fetch followed by normalization. Implementations do
/// not cache; caching belongs to the caller.
#[async_trait]
pub trait StatementSource: DataProvider {
    /// Fetches one statement and normalizes it into a [`StatementTable`].
    async fn fetch_statement(&self, symbol: &Symbol, kind: StatementKind)
    -> Result<StatementTable>;

    /// Fetches the free-form company profile.
    async fn fetch_profile(&self, symbol: &Symbol) -> Result<Profile>;
}

#[async_trait]
impl<S: StatementSource + ?Sized> StatementSource for std::sync::Arc<S> {
    async fn fetch_statement(
        &self,
        symbol: &Symbol,
        kind: StatementKind,
    ) -> Result<StatementTable> {
        (**self).fetch_statement(symbol, kind).await
    }

    async fn fetch_profile(&self, symbol: &Symbol) -> Result<Profile> {
        (**self).fetch_profile(symbol).await
    }
}

impl<P: DataProvider + ?Sized> DataProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}
