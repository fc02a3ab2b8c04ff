//! Pipeline tying ticker resolution, facts retrieval, and extraction together.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use facts_cache::NoopCache;
use facts_core::{
    Cik, CikSource, CikTable, CompanySnapshot, ExtractOptions, FactsCache, FactsError,
    FactsProvider, LastTrade, MarketDataProvider, OhlcvBar, Result, Ticker, TickerDetails,
    extract_metrics_with,
};
use serde::Serialize;

/// Trailing window of daily bars attached to an overview.
const DEFAULT_BAR_DAYS: u32 = 30;

/// A company snapshot with optional market data attached.
///
/// Market-data failures degrade to absent fields rather than failing the
/// overview; the fundamentals are the load-bearing part.
#[derive(Clone, Debug, Serialize)]
pub struct CompanyOverview {
    /// Extracted metrics and ratios.
    pub fundamentals: CompanySnapshot,
    /// Ticker reference details, when available.
    pub details: Option<TickerDetails>,
    /// Most recent trade, when available.
    pub last_trade: Option<LastTrade>,
    /// Trailing daily bars; empty when unavailable.
    pub bars: Vec<OhlcvBar>,
}

/// Service that produces normalized fundamentals for a ticker.
///
/// Holds the current CIK table as an immutable snapshot behind an `RwLock`:
/// lookups clone an `Arc` and never block a concurrent refresh, and a
/// refresh swaps in a whole new table. A refresh that fails over the network
/// falls back to the most recent cached table.
pub struct FactsService {
    facts_provider: Arc<dyn FactsProvider>,
    cik_source: Arc<dyn CikSource>,
    market: Option<Arc<dyn MarketDataProvider>>,
    cache: Arc<dyn FactsCache>,
    cik_table: RwLock<Option<Arc<CikTable>>>,
    options: ExtractOptions,
}

impl std::fmt::Debug for FactsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactsService")
            .field("facts_provider", &self.facts_provider.name())
            .field("cik_source", &self.cik_source.name())
            .field("market", &self.market.as_ref().map(|m| m.name()))
            .field("options", &self.options)
            .finish()
    }
}

impl FactsService {
    /// Create a service over a facts provider and CIK source, uncached.
    #[must_use]
    pub fn new(facts_provider: Arc<dyn FactsProvider>, cik_source: Arc<dyn CikSource>) -> Self {
        Self {
            facts_provider,
            cik_source,
            market: None,
            cache: Arc::new(NoopCache::new()),
            cik_table: RwLock::new(None),
            options: ExtractOptions::default(),
        }
    }

    /// Create a service backed by SEC EDGAR for both facts and CIK data.
    #[cfg(feature = "edgar")]
    #[must_use]
    pub fn with_edgar(user_agent: &str) -> Self {
        let provider = Arc::new(facts_edgar::EdgarProvider::new(user_agent));
        Self::new(provider.clone(), provider)
    }

    /// Set the cache used for facts documents and CIK table snapshots.
    #[must_use]
    pub fn set_cache(mut self, cache: Arc<dyn FactsCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Attach a market data provider for company overviews.
    #[must_use]
    pub fn set_market(mut self, market: Arc<dyn MarketDataProvider>) -> Self {
        self.market = Some(market);
        self
    }

    /// Attach the Polygon market data provider.
    #[cfg(feature = "polygon")]
    #[must_use]
    pub fn with_polygon(self, api_key: &str) -> Self {
        self.set_market(Arc::new(facts_polygon::PolygonProvider::new(api_key)))
    }

    /// Override the extraction options.
    #[must_use]
    pub const fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the current CIK table, loading one if none is held yet.
    pub async fn cik_table(&self) -> Result<Arc<CikTable>> {
        if let Some(table) = self.cik_table.read().await.clone() {
            return Ok(table);
        }
        self.refresh_cik_table().await
    }

    /// Fetches a fresh CIK table snapshot and swaps it in.
    ///
    /// On a network failure the most recent cached snapshot is swapped in
    /// instead; the fetch error only surfaces when no cached table exists
    /// either. Concurrent lookups keep using the old table until the swap.
    pub async fn refresh_cik_table(&self) -> Result<Arc<CikTable>> {
        let table = match self.cik_source.fetch_cik_table().await {
            Ok(table) => {
                if let Err(e) = self.cache.put_cik_table(&table).await {
                    warn!(error = %e, "Failed to cache CIK table");
                }
                table
            }
            Err(e) => {
                warn!(error = %e, "CIK table refresh failed, falling back to cached snapshot");
                match self.cache.get_cik_table().await {
                    Ok(Some(cached)) => {
                        debug!(fetched_at = %cached.fetched_at(), "Using cached CIK table");
                        cached
                    }
                    _ => return Err(e),
                }
            }
        };

        let table = Arc::new(table);
        *self.cik_table.write().await = Some(table.clone());
        Ok(table)
    }

    /// Resolves a ticker to its CIK.
    ///
    /// `Ok(None)` is a normal outcome: not every symbol maps to a disclosing
    /// entity.
    pub async fn resolve_cik(&self, ticker: &Ticker) -> Result<Option<Cik>> {
        let table = self.cik_table().await?;
        Ok(table.lookup(ticker).cloned())
    }

    /// Fetches the raw company facts document for an entity, cache-first.
    ///
    /// Cache failures on either side are logged and never fatal: a failed
    /// read falls through to the provider, a failed write keeps the fetched
    /// document.
    pub async fn company_facts(&self, cik: &Cik) -> Result<facts_core::CompanyFacts> {
        match self.cache.get_facts(cik).await {
            Ok(Some(cached)) => {
                debug!(cik = %cik, "Cache hit for company facts");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => warn!(cik = %cik, error = %e, "Failed to read cached company facts"),
        }

        let facts = self.facts_provider.company_facts(cik).await?;
        if let Err(e) = self.cache.put_facts(cik, &facts).await {
            warn!(cik = %cik, error = %e, "Failed to cache company facts");
        }
        Ok(facts)
    }

    /// Produces the normalized snapshot for a ticker.
    ///
    /// # Errors
    /// Returns [`FactsError::TickerNotFound`] when the ticker does not map
    /// to a disclosing entity.
    pub async fn company_snapshot(&self, ticker: &Ticker) -> Result<CompanySnapshot> {
        let Some(cik) = self.resolve_cik(ticker).await? else {
            return Err(FactsError::TickerNotFound(ticker.to_string()));
        };

        let facts = self.company_facts(&cik).await?;
        let metrics = extract_metrics_with(&facts, self.options);
        Ok(CompanySnapshot::new(ticker.clone(), metrics))
    }

    /// Produces a snapshot with market data attached.
    ///
    /// Fundamental failures propagate; market-data failures are logged and
    /// leave the corresponding fields absent.
    pub async fn company_overview(&self, ticker: &Ticker) -> Result<CompanyOverview> {
        let fundamentals = self.company_snapshot(ticker).await?;

        let mut overview = CompanyOverview {
            fundamentals,
            details: None,
            last_trade: None,
            bars: Vec::new(),
        };

        if let Some(market) = &self.market {
            match market.ticker_details(ticker).await {
                Ok(details) => overview.details = Some(details),
                Err(e) => warn!(ticker = %ticker, error = %e, "Ticker details unavailable"),
            }
            match market.last_trade(ticker).await {
                Ok(trade) => overview.last_trade = Some(trade),
                Err(e) => warn!(ticker = %ticker, error = %e, "Last trade unavailable"),
            }
            match market.daily_bars(ticker, DEFAULT_BAR_DAYS).await {
                Ok(bars) => overview.bars = bars,
                Err(e) => warn!(ticker = %ticker, error = %e, "Daily bars unavailable"),
            }
        }

        Ok(overview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use facts_cache::InMemoryCache;
    use facts_core::{CikEntry, CompanyFacts, CompanyProfile, DataProvider};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Stub EDGAR standing in for the network.
    #[derive(Debug, Default)]
    struct StubEdgar {
        facts: HashMap<String, CompanyFacts>,
        table: Option<CikTable>,
        facts_calls: AtomicUsize,
    }

    impl StubEdgar {
        fn with_apple() -> Self {
            let facts = serde_json::from_value(serde_json::json!({
                "facts": { "us-gaap": {
                    "Revenues": { "units": { "USD": [
                        { "end": "2023-12-31", "val": 1000.0, "form": "10-K" }
                    ]}},
                    "NetIncomeLoss": { "units": { "USD": [
                        { "end": "2023-12-31", "val": 100.0, "form": "10-K" }
                    ]}}
                }}
            }))
            .unwrap();

            let mut entries = HashMap::new();
            entries.insert(
                "AAPL".to_string(),
                CikEntry {
                    cik: Cik::from_number(320_193),
                    title: "Apple Inc.".to_string(),
                },
            );

            Self {
                facts: HashMap::from([("0000320193".to_string(), facts)]),
                table: Some(CikTable::new(entries)),
                facts_calls: AtomicUsize::new(0),
            }
        }
    }

    impl DataProvider for StubEdgar {
        fn name(&self) -> &str {
            "stub"
        }

        fn description(&self) -> &str {
            "stub provider"
        }
    }

    #[async_trait]
    impl FactsProvider for StubEdgar {
        async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts> {
            self.facts_calls.fetch_add(1, Ordering::SeqCst);
            self.facts
                .get(cik.as_str())
                .cloned()
                .ok_or_else(|| FactsError::Network(format!("no facts for {cik}")))
        }

        async fn company_profile(&self, cik: &Cik) -> Result<CompanyProfile> {
            Ok(CompanyProfile {
                cik: cik.clone(),
                name: "Apple Inc.".to_string(),
                exchanges: vec!["Nasdaq".to_string()],
                sic: None,
                sic_description: None,
            })
        }
    }

    #[async_trait]
    impl CikSource for StubEdgar {
        async fn fetch_cik_table(&self) -> Result<CikTable> {
            self.table
                .clone()
                .ok_or_else(|| FactsError::Network("bulk file unavailable".to_string()))
        }
    }

    /// Cache whose reads always fail; writes succeed without effect.
    #[derive(Debug)]
    struct BrokenReadCache;

    #[async_trait]
    impl FactsCache for BrokenReadCache {
        async fn get_facts(&self, _cik: &Cik) -> Result<Option<CompanyFacts>> {
            Err(FactsError::Cache("read failed".to_string()))
        }

        async fn put_facts(&self, _cik: &Cik, _facts: &CompanyFacts) -> Result<()> {
            Ok(())
        }

        async fn get_cik_table(&self) -> Result<Option<CikTable>> {
            Err(FactsError::Cache("read failed".to_string()))
        }

        async fn put_cik_table(&self, _table: &CikTable) -> Result<()> {
            Ok(())
        }

        async fn invalidate_stale(&self, _ttl: std::time::Duration) -> Result<usize> {
            Ok(0)
        }

        async fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    fn service(stub: StubEdgar) -> FactsService {
        let provider = Arc::new(stub);
        FactsService::new(provider.clone(), provider)
    }

    #[tokio::test]
    async fn snapshot_pipeline_end_to_end() {
        let service = service(StubEdgar::with_apple());

        let snapshot = service.company_snapshot(&Ticker::new("aapl")).await.unwrap();
        assert_eq!(snapshot.metrics().revenue, Some(1000.0));
        assert_eq!(snapshot.metrics().net_income, Some(100.0));
        assert_eq!(snapshot.metrics().total_assets, None);

        let ratios = snapshot.ratios();
        assert_eq!(ratios.gross_margin, Some(10.0));
        assert_eq!(ratios.debt_to_equity, None);
        assert_eq!(ratios.revenue_growth, None);
    }

    #[tokio::test]
    async fn unknown_ticker_resolves_to_none_and_snapshot_errors() {
        let service = service(StubEdgar::with_apple());
        let ticker = Ticker::new("ZZZZ");

        assert!(service.resolve_cik(&ticker).await.unwrap().is_none());

        let err = service.company_snapshot(&ticker).await.unwrap_err();
        assert!(matches!(err, FactsError::TickerNotFound(_)));
    }

    #[tokio::test]
    async fn facts_are_served_from_cache_after_first_fetch() {
        let stub = Arc::new(StubEdgar::with_apple());
        let service = FactsService::new(stub.clone(), stub.clone())
            .set_cache(Arc::new(InMemoryCache::new()));

        let ticker = Ticker::new("AAPL");
        service.company_snapshot(&ticker).await.unwrap();
        service.company_snapshot(&ticker).await.unwrap();

        assert_eq!(stub.facts_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_read_failure_falls_through_to_provider() {
        let stub = Arc::new(StubEdgar::with_apple());
        let service = FactsService::new(stub.clone(), stub.clone())
            .set_cache(Arc::new(BrokenReadCache));

        let snapshot = service.company_snapshot(&Ticker::new("AAPL")).await.unwrap();
        assert_eq!(snapshot.metrics().revenue, Some(1000.0));
        assert_eq!(stub.facts_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_falls_back_to_cached_table_on_failure() {
        let cache = Arc::new(InMemoryCache::new());

        // Seed the cache from a working source.
        {
            let working = service(StubEdgar::with_apple());
            let table = working.refresh_cik_table().await.unwrap();
            cache.put_cik_table(&table).await.unwrap();
        }

        // A source with no table fails over the network.
        let broken = StubEdgar {
            table: None,
            ..Default::default()
        };
        let provider = Arc::new(broken);
        let service =
            FactsService::new(provider.clone(), provider).set_cache(cache);

        let table = service.refresh_cik_table().await.unwrap();
        assert!(table.lookup(&Ticker::new("AAPL")).is_some());
    }

    #[tokio::test]
    async fn refresh_with_no_fallback_surfaces_the_error() {
        let broken = StubEdgar {
            table: None,
            ..Default::default()
        };
        let service = service(broken);

        let err = service.refresh_cik_table().await.unwrap_err();
        assert!(matches!(err, FactsError::Network(_)));
    }

    #[tokio::test]
    async fn overview_without_market_provider_has_absent_market_fields() {
        let service = service(StubEdgar::with_apple());

        let overview = service.company_overview(&Ticker::new("AAPL")).await.unwrap();
        assert!(overview.details.is_none());
        assert!(overview.last_trade.is_none());
        assert!(overview.bars.is_empty());
        assert_eq!(overview.fundamentals.metrics().revenue, Some(1000.0));
    }
}
