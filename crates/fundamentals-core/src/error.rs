//! Error types for statement ingestion.
//!
//! This module defines [`DataError`] which covers every way a fetch can fail,
//! from reaching the source through to normalizing what it returned.

use thiserror::Error;

/// Errors that can occur while fetching or normalizing financial data.
#[derive(Error, Debug)]
pub enum DataError {
    /// The source could not be reached (connection failure, timeout,
    /// browser-session failure, vendor error body).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The source was reachable but returned no records.
    #[error("Empty response from {source_name} for {what}")]
    EmptySource {
        /// Name of the source that returned nothing.
        source_name: String,
        /// What was requested (statement kind, profile, ...).
        what: String,
    },

    /// An HTML document or rendered page contained no table rows.
    #[error("No table rows found in {0}")]
    EmptyDocument(String),

    /// The header row carrying the period labels never appeared.
    #[error("No header row labelled {sentinel:?} found")]
    NoHeaderFound {
        /// The sentinel label that was searched for.
        sentinel: String,
    },

    /// A structural assumption about the source layout was violated.
    #[error("Format error: {0}")]
    Format(String),

    /// A rendered row could not be split into label/value groups unambiguously.
    #[error("Malformed row {label:?}: {reason}")]
    MalformedRow {
        /// Leading label of the offending row.
        label: String,
        /// Why the row could not be decomposed.
        reason: String,
    },
}

impl DataError {
    /// Builds a [`DataError::Format`] from anything displayable.
    pub fn format(msg: impl std::fmt::Display) -> Self {
        Self::Format(msg.to_string())
    }

    /// Returns true for errors raised before any data reached the parser.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::RateLimited { .. } | Self::SymbolNotFound(_)
        )
    }
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DataError::NoHeaderFound {
            sentinel: "Period Ending".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No header row labelled \"Period Ending\" found"
        );

        let err = DataError::EmptySource {
            source_name: "FMP".to_string(),
            what: "cash_flow".to_string(),
        };
        assert_eq!(err.to_string(), "Empty response from FMP for cash_flow");
    }

    #[test]
    fn test_is_transport() {
        assert!(DataError::Transport("timeout".into()).is_transport());
        assert!(DataError::SymbolNotFound("ZZZZ".into()).is_transport());
        assert!(!DataError::format("bad date").is_transport());
    }
}
