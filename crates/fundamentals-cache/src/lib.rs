#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fetch-once statement caching.
//!
//! - [`StatementResolver`] - Per-ticker access to statements and profile
//! - [`StatementSlots`] - The underlying slot storage

/// Per-ticker statement resolver.
pub mod resolver;
/// Slot storage for fetched statements.
pub mod slots;

pub use resolver::StatementResolver;
pub use slots::{CacheEntry, StatementSlots};
