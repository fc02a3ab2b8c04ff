#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sharpevision/facts/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and extraction logic for company fundamentals.
//!
//! The extraction pipeline is pure computation over an immutable
//! [`CompanyFacts`](xbrl::CompanyFacts) snapshot: no I/O, no locking, no
//! shared state, so any number of extractions may run concurrently.
//!
//! # Example
//!
//! ```
//! use facts_core::{CompanySnapshot, Ticker, extract::extract_metrics, xbrl::CompanyFacts};
//!
//! let doc = serde_json::json!({
//!     "facts": { "us-gaap": {
//!         "Revenues": { "units": { "USD": [
//!             { "end": "2023-12-31", "val": 1000, "form": "10-K" }
//!         ]}},
//!         "NetIncomeLoss": { "units": { "USD": [
//!             { "end": "2023-12-31", "val": 100, "form": "10-K" }
//!         ]}}
//!     }}
//! });
//!
//! let facts: CompanyFacts = serde_json::from_value(doc).unwrap();
//! let snapshot = CompanySnapshot::new(Ticker::new("AAPL"), extract_metrics(&facts));
//! assert_eq!(snapshot.ratios().gross_margin, Some(10.0));
//! ```

/// Cache trait for storing fetched company data.
pub mod cache;
/// Error types for fundamental data operations.
pub mod error;
/// Concept resolution and metric extraction.
pub mod extract;
/// Provider traits for fetching company and market data.
pub mod provider;
/// Derived ratios over extracted metrics.
pub mod ratio;
/// Core data types (Ticker, Cik, Metrics, etc.).
pub mod types;
/// Model of the EDGAR company facts document.
pub mod xbrl;

// Re-export commonly used items at crate root
pub use cache::FactsCache;
pub use error::{FactsError, Result};
pub use extract::{ExtractOptions, extract_metrics, extract_metrics_with};
pub use provider::{CikSource, DataProvider, FactsProvider, MarketDataProvider};
pub use ratio::Ratios;
pub use types::{
    Cik, CikEntry, CikTable, CompanyProfile, CompanySnapshot, LastTrade, Metric, Metrics,
    OhlcvBar, Ticker, TickerDetails,
};
pub use xbrl::{CompanyFacts, ConceptFacts, Fact};
