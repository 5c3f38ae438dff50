//! Per-ticker statement resolver.

use chrono::{DateTime, Utc};
use fundamentals_core::{Profile, Result, StatementKind, StatementSource, StatementTable, Symbol};
use tracing::{debug, instrument};

use crate::slots::{CacheEntry, StatementSlots};

/// Fetch-once access to the statements of one ticker.
///
/// Each statement (and the profile) is fetched from the source on first
/// access and served from memory afterwards. A failed fetch stores nothing,
/// so the next access tries again.
///
/// # Example
///
/// ```rust,ignore
/// use fundamentals_cache::StatementResolver;
/// use fundamentals_fmp::FmpProvider;
///
/// let mut resolver = StatementResolver::new("AAPL", FmpProvider::from_env());
/// let assets = resolver.balance_sheet().await?.row("totalAssets");
/// let market_cap = resolver.profile_value("mktCap").await?;
/// ```
#[derive(Debug)]
pub struct StatementResolver<S> {
    symbol: Symbol,
    source: S,
    slots: StatementSlots,
    label_column: Option<String>,
}

impl<S: StatementSource> StatementResolver<S> {
    /// Create a resolver for `symbol` backed by `source`.
    pub fn new(symbol: impl Into<Symbol>, source: S) -> Self {
        Self {
            symbol: symbol.into(),
            source,
            slots: StatementSlots::new(),
            label_column: None,
        }
    }

    /// Name the row-label column of every table this resolver hands out.
    ///
    /// Applies to tables already fetched as well as later ones.
    #[must_use]
    pub fn with_label_column(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.slots.relabel(&name);
        self.label_column = Some(name);
        self
    }

    /// The ticker this resolver serves.
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// The underlying statement source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns true once `kind` has been fetched.
    pub fn is_fetched(&self, kind: StatementKind) -> bool {
        self.slots.is_fetched(kind)
    }

    /// When `kind` was fetched.
    pub fn fetched_at(&self, kind: StatementKind) -> Option<DateTime<Utc>> {
        self.slots.fetched_at(kind)
    }

    /// Statement of the given kind if already fetched, without fetching.
    pub fn cached(&self, kind: StatementKind) -> Option<&StatementTable> {
        self.slots.get(kind)
    }

    /// Returns true once the profile has been fetched.
    pub const fn is_profile_fetched(&self) -> bool {
        self.slots.is_profile_fetched()
    }

    /// Profile if already fetched, without fetching.
    pub fn cached_profile(&self) -> Option<&Profile> {
        self.slots.profile()
    }

    /// Statement of the given kind, fetched on first access.
    #[instrument(skip(self), fields(provider = %self.source.name(), symbol = %self.symbol))]
    pub async fn statement(&mut self, kind: StatementKind) -> Result<&StatementTable> {
        let Self {
            symbol,
            source,
            slots,
            label_column,
        } = self;

        let slot = slots.statement_slot(kind);
        let entry = match slot {
            Some(entry) => {
                debug!("Cache hit for statement");
                entry
            }
            None => {
                debug!("Cache miss for statement");
                let mut table = source.fetch_statement(symbol, kind).await?;
                if let Some(name) = label_column {
                    table.rename_label_column(name.as_str());
                }
                debug!(
                    rows = table.rows().len(),
                    periods = table.periods().len(),
                    "Cached statement"
                );
                slot.insert(CacheEntry::new(table))
            }
        };
        Ok(entry.data())
    }

    /// Balance sheet, fetched on first access.
    pub async fn balance_sheet(&mut self) -> Result<&StatementTable> {
        self.statement(StatementKind::BalanceSheet).await
    }

    /// Income statement, fetched on first access.
    pub async fn income_statement(&mut self) -> Result<&StatementTable> {
        self.statement(StatementKind::IncomeStatement).await
    }

    /// Cash flow statement, fetched on first access.
    pub async fn cash_flow(&mut self) -> Result<&StatementTable> {
        self.statement(StatementKind::CashFlow).await
    }

    /// Company profile, fetched on first access.
    #[instrument(skip(self), fields(provider = %self.source.name(), symbol = %self.symbol))]
    pub async fn profile(&mut self) -> Result<&Profile> {
        let Self {
            symbol,
            source,
            slots,
            ..
        } = self;

        let slot = slots.profile_slot();
        let entry = match slot {
            Some(entry) => {
                debug!("Cache hit for profile");
                entry
            }
            None => {
                debug!("Cache miss for profile");
                let profile = source.fetch_profile(symbol).await?;
                slot.insert(CacheEntry::new(profile))
            }
        };
        Ok(entry.data())
    }

    /// Numeric profile attribute; a key the profile lacks is zero.
    pub async fn profile_value(&mut self, key: &str) -> Result<f64> {
        self.profile().await?.value(key)
    }
}
