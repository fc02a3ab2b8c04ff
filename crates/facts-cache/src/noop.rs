//! No-op cache implementation.

use async_trait::async_trait;
use facts_core::{Cik, CikTable, CompanyFacts, FactsCache, Result};
use std::time::Duration;

/// A cache that stores nothing.
///
/// Every get is a miss and every put succeeds without effect. Useful when
/// callers want the pipeline's cache seam without any caching behavior.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FactsCache for NoopCache {
    async fn get_facts(&self, _cik: &Cik) -> Result<Option<CompanyFacts>> {
        Ok(None)
    }

    async fn put_facts(&self, _cik: &Cik, _facts: &CompanyFacts) -> Result<()> {
        Ok(())
    }

    async fn get_cik_table(&self) -> Result<Option<CikTable>> {
        Ok(None)
    }

    async fn put_cik_table(&self, _table: &CikTable) -> Result<()> {
        Ok(())
    }

    async fn invalidate_stale(&self, _ttl: Duration) -> Result<usize> {
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}
