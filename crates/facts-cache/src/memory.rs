//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::Utc;
use facts_core::{Cik, CikTable, CompanyFacts, FactsCache, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Cache entry with timestamp for TTL-based invalidation.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: chrono::DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age > chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX)
    }
}

/// Simple in-memory cache for testing and development.
///
/// Data is stored in `RwLock`-protected maps and is lost when the cache is
/// dropped. Documents are cloned on get/put operations.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    facts: RwLock<HashMap<String, CacheEntry<CompanyFacts>>>,
    cik_table: RwLock<Option<CacheEntry<CikTable>>>,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FactsCache for InMemoryCache {
    #[instrument(skip(self), fields(cik = %cik))]
    async fn get_facts(&self, cik: &Cik) -> Result<Option<CompanyFacts>> {
        let cache = self.facts.read().await;
        match cache.get(cik.as_str()) {
            Some(entry) => {
                debug!("Cache hit for company facts");
                Ok(Some(entry.data.clone()))
            }
            None => {
                debug!("Cache miss for company facts");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, facts), fields(cik = %cik))]
    async fn put_facts(&self, cik: &Cik, facts: &CompanyFacts) -> Result<()> {
        let mut cache = self.facts.write().await;
        cache.insert(cik.as_str().to_string(), CacheEntry::new(facts.clone()));
        debug!("Cached company facts");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_cik_table(&self) -> Result<Option<CikTable>> {
        let cache = self.cik_table.read().await;
        match cache.as_ref() {
            Some(entry) => {
                debug!("Cache hit for CIK table");
                Ok(Some(entry.data.clone()))
            }
            None => {
                debug!("Cache miss for CIK table");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, table), fields(tickers = table.len()))]
    async fn put_cik_table(&self, table: &CikTable) -> Result<()> {
        let mut cache = self.cik_table.write().await;
        *cache = Some(CacheEntry::new(table.clone()));
        debug!("Cached CIK table");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let mut total_removed = 0usize;

        {
            let mut cache = self.facts.write().await;
            let before = cache.len();
            cache.retain(|_, entry| !entry.is_stale(ttl));
            total_removed += before - cache.len();
        }

        {
            let mut cache = self.cik_table.write().await;
            if cache.as_ref().is_some_and(|entry| entry.is_stale(ttl)) {
                *cache = None;
                total_removed += 1;
            }
        }

        if total_removed > 0 {
            debug!("Invalidated {} stale cache entries", total_removed);
        }

        Ok(total_removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.facts.write().await.clear();
        *self.cik_table.write().await = None;
        debug!("Cleared all cache entries");
        Ok(())
    }
}
