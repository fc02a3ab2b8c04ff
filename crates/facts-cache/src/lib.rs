#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sharpevision/facts/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Caching implementations for company fundamental data.
//!
//! Implementations of the [`facts_core::FactsCache`] trait:
//!
//! - [`InMemoryCache`] - TTL-based in-memory cache
//! - [`DiskCache`] - dated JSON archives of raw facts and CIK tables
//! - [`NoopCache`] - no caching

/// On-disk JSON archival cache.
pub mod disk;
/// In-memory cache implementation.
pub mod memory;
/// No-op cache implementation.
pub mod noop;

pub use disk::DiskCache;
pub use memory::InMemoryCache;
pub use noop::NoopCache;
