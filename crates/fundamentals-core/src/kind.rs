//! Statement kind definitions.
//!
//! This module defines [`StatementKind`], the fixed set of statements every
//! source knows how to fetch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// One of the three financial statements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Balance sheet statement.
    BalanceSheet,
    /// Income statement.
    IncomeStatement,
    /// Cash flow statement.
    CashFlow,
}

impl StatementKind {
    /// Every statement kind, in slot order.
    pub const ALL: [Self; 3] = [Self::BalanceSheet, Self::IncomeStatement, Self::CashFlow];

    /// Returns the snake_case name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance_sheet",
            Self::IncomeStatement => "income_statement",
            Self::CashFlow => "cash_flow",
        }
    }

    /// Position of this kind in [`StatementKind::ALL`].
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::BalanceSheet => 0,
            Self::IncomeStatement => 1,
            Self::CashFlow => 2,
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "balance_sheet" | "balance_sheet_statement" => Ok(Self::BalanceSheet),
            "income_statement" | "financials" => Ok(Self::IncomeStatement),
            "cash_flow" | "cash_flow_statement" => Ok(Self::CashFlow),
            other => Err(DataError::format(format!("unknown statement kind {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all() {
        for (i, kind) in StatementKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "balance-sheet".parse::<StatementKind>().unwrap(),
            StatementKind::BalanceSheet
        );
        assert_eq!(
            "cash_flow_statement".parse::<StatementKind>().unwrap(),
            StatementKind::CashFlow
        );
        assert_eq!(
            "Income_Statement".parse::<StatementKind>().unwrap(),
            StatementKind::IncomeStatement
        );
        assert!("summary".parse::<StatementKind>().is_err());
    }
}
