#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for financial statement ingestion.
//!
//! This crate provides the contract every source normalizes into:
//!
//! - [`StatementTable`](table::StatementTable) - Row × period matrix of values
//! - [`coerce`](coerce::coerce) - Vendor string to number, caller-selected [`Scale`](coerce::Scale)
//! - [`parse_period`](period::parse_period) - Period labels to calendar dates
//! - [`StatementSource`](provider::StatementSource) - Fetch + normalize trait
//! - [`DataError`](error::DataError) - Error taxonomy

/// Numeric coercion of vendor strings.
pub mod coerce;
/// Error types for ingestion.
pub mod error;
/// Statement kind definitions.
pub mod kind;
/// Period key parsing.
pub mod period;
/// Provider traits for fetching statements.
pub mod provider;
/// The canonical statement table.
pub mod table;
/// Core data types (Symbol, Profile).
pub mod types;

// Re-export commonly used items at crate root
pub use coerce::{Scale, coerce};
pub use error::{DataError, Result};
pub use kind::StatementKind;
pub use period::{PeriodFormat, format_period, parse_period};
pub use provider::{DataProvider, StatementSource};
pub use table::{DEFAULT_LABEL_COLUMN, StatementTable};
pub use types::{Profile, ProfileValue, Symbol};
