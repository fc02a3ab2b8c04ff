//! Cache trait for storing fetched company data.
//!
//! This module defines the [`FactsCache`] trait that provides a unified
//! interface for caching raw company facts documents and the ticker-to-CIK
//! table. The table entry doubles as the outage fallback: a refresh that
//! fails over the network can fall back to the most recent cached snapshot.

use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::Result,
    types::{Cik, CikTable},
    xbrl::CompanyFacts,
};

/// Trait for caching fetched company data.
///
/// Implementations can store data in various backends (in-memory, on-disk
/// JSON archives, etc.) to avoid repeated API calls and to survive upstream
/// outages.
#[async_trait]
pub trait FactsCache: Send + Sync {
    /// Retrieves a cached company facts document.
    ///
    /// Returns `Ok(Some(facts))` if cached, `Ok(None)` if not cached.
    async fn get_facts(&self, cik: &Cik) -> Result<Option<CompanyFacts>>;

    /// Stores a company facts document in the cache.
    async fn put_facts(&self, cik: &Cik, facts: &CompanyFacts) -> Result<()>;

    /// Retrieves the most recent cached ticker-to-CIK table.
    async fn get_cik_table(&self) -> Result<Option<CikTable>>;

    /// Stores a ticker-to-CIK table snapshot in the cache.
    async fn put_cik_table(&self, table: &CikTable) -> Result<()>;

    /// Removes cache entries older than the specified TTL.
    ///
    /// Returns the number of entries invalidated.
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
