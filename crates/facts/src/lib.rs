#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sharpevision/facts/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Normalized company fundamentals from SEC filings.
//!
//! This crate re-exports the core types and the provider/cache
//! implementations, and provides [`FactsService`] for the full
//! ticker-to-snapshot pipeline.
//!
//! # Features
//!
//! - `edgar` - SEC EDGAR client for facts and CIK data
//! - `polygon` - Polygon.io market data client
//!
//! # Example
//!
//! ```rust,ignore
//! use facts::{FactsService, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> facts::Result<()> {
//!     let service = FactsService::with_edgar("MyApp/1.0 (contact@example.com)");
//!
//!     let snapshot = service.company_snapshot(&Ticker::new("AAPL")).await?;
//!     println!("{}", serde_json::to_string_pretty(&snapshot).unwrap());
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use facts_core::*;

// Cache implementations
pub use facts_cache::{DiskCache, InMemoryCache, NoopCache};

// Providers
#[cfg(feature = "edgar")]
pub use facts_edgar::EdgarProvider;
#[cfg(feature = "polygon")]
pub use facts_polygon::PolygonProvider;

mod service;
pub use service::{CompanyOverview, FactsService};
