//! Fetch-once storage for one ticker.

use chrono::{DateTime, Utc};
use fundamentals_core::{Profile, StatementKind, StatementTable};

/// A stored value with the time it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    data: T,
    fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Wraps freshly fetched data.
    pub fn new(data: T) -> Self {
        Self {
            data,
            fetched_at: Utc::now(),
        }
    }

    /// The stored data.
    pub const fn data(&self) -> &T {
        &self.data
    }

    /// When the data was fetched.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// One slot per statement kind plus one profile slot.
///
/// A slot is either empty (unfetched) or filled (fetched). Filled slots are
/// never emptied or replaced.
#[derive(Debug, Default, Clone)]
pub struct StatementSlots {
    statements: [Option<CacheEntry<StatementTable>>; 3],
    profile: Option<CacheEntry<Profile>>,
}

impl StatementSlots {
    /// Creates empty slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once a statement has been stored.
    #[must_use]
    pub fn is_fetched(&self, kind: StatementKind) -> bool {
        self.statements[kind.index()].is_some()
    }

    /// Stored statement, if fetched.
    #[must_use]
    pub fn get(&self, kind: StatementKind) -> Option<&StatementTable> {
        self.statements[kind.index()].as_ref().map(CacheEntry::data)
    }

    /// When a statement was fetched.
    #[must_use]
    pub fn fetched_at(&self, kind: StatementKind) -> Option<DateTime<Utc>> {
        self.statements[kind.index()]
            .as_ref()
            .map(CacheEntry::fetched_at)
    }

    /// Stored profile, if fetched.
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref().map(CacheEntry::data)
    }

    /// Returns true once the profile has been stored.
    #[must_use]
    pub const fn is_profile_fetched(&self) -> bool {
        self.profile.is_some()
    }

    /// Renames the label column of every stored statement.
    pub fn relabel(&mut self, name: &str) {
        for entry in self.statements.iter_mut().flatten() {
            entry.data.rename_label_column(name);
        }
    }

    pub(crate) fn statement_slot(
        &mut self,
        kind: StatementKind,
    ) -> &mut Option<CacheEntry<StatementTable>> {
        &mut self.statements[kind.index()]
    }

    pub(crate) fn profile_slot(&mut self) -> &mut Option<CacheEntry<Profile>> {
        &mut self.profile
    }
}
