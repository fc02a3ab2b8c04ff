#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sharpevision/facts/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Polygon.io market data client.
//!
//! # Example
//!
//! ```no_run
//! use facts_polygon::PolygonProvider;
//! use facts_core::{MarketDataProvider, Ticker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = PolygonProvider::from_env()?;
//!
//!     let ticker = Ticker::new("AAPL");
//!     let trade = provider.last_trade(&ticker).await?;
//!     println!("Last trade: {:?}", trade.price);
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use facts_core::{
    DataProvider, FactsError, LastTrade, MarketDataProvider, OhlcvBar, Result, Ticker,
    TickerDetails,
};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// Base URL for the Polygon API.
const POLYGON_BASE_URL: &str = "https://api.polygon.io/v3";

/// Environment variable holding the API key.
const API_KEY_ENV: &str = "POLYGON_API_KEY";

/// Polygon.io market data client.
///
/// Provides ticker reference details, the most recent trade, and daily
/// OHLCV bars.
#[derive(Clone)]
pub struct PolygonProvider {
    client: Client,
    api_key: String,
}

impl fmt::Debug for PolygonProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolygonProvider")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl PolygonProvider {
    /// Create a new Polygon client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create a new Polygon client with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Create a client with the API key from the `POLYGON_API_KEY`
    /// environment variable.
    ///
    /// # Errors
    /// Returns [`FactsError::InvalidParameter`] if the variable is unset.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            FactsError::InvalidParameter(format!("{API_KEY_ENV} environment variable is not set"))
        })?;
        Ok(Self::new(api_key))
    }

    /// Make an authenticated GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{POLYGON_BASE_URL}/{endpoint}");
        debug!("Polygon request: {}", endpoint);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| FactsError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FactsError::RateLimited {
                source: "Polygon".to_string(),
                retry_after: None,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FactsError::Network(format!("HTTP {status}: {text}")));
        }

        response
            .json()
            .await
            .map_err(|e| FactsError::Parse(e.to_string()))
    }
}

impl DataProvider for PolygonProvider {
    fn name(&self) -> &str {
        "Polygon"
    }

    fn description(&self) -> &str {
        "Polygon.io market data client for ticker details, trades, and daily bars"
    }
}

#[async_trait]
impl MarketDataProvider for PolygonProvider {
    async fn ticker_details(&self, ticker: &Ticker) -> Result<TickerDetails> {
        let endpoint = format!("reference/tickers/{ticker}");
        let response: TickerDetailsResponse = self.get(&endpoint).await?;
        let results = response.results.unwrap_or_default();

        Ok(TickerDetails {
            name: results.name,
            market: results.market,
            // The SIC description is the closest thing the source has to a
            // sector; treat it as low-confidence reference data.
            sector: results.sic_description,
            industry: results.industry,
            market_cap: results.market_cap,
        })
    }

    async fn last_trade(&self, ticker: &Ticker) -> Result<LastTrade> {
        let endpoint = format!("last/trade/{ticker}");
        let response: LastTradeResponse = self.get(&endpoint).await?;
        let results = response.results.unwrap_or_default();

        Ok(LastTrade {
            price: results.p,
            size: results.s,
            timestamp: results.t.map(DateTime::from_timestamp_nanos),
        })
    }

    async fn daily_bars(&self, ticker: &Ticker, days: u32) -> Result<Vec<OhlcvBar>> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(i64::from(days));
        let endpoint = format!("aggs/ticker/{ticker}/range/1/day/{start}/{end}");
        let response: AggsResponse = self.get(&endpoint).await?;

        Ok(response.results.iter().filter_map(to_bar).collect())
    }
}

/// Converts one aggregate row into a bar, dropping rows with bad timestamps.
fn to_bar(agg: &AggBar) -> Option<OhlcvBar> {
    Some(OhlcvBar {
        timestamp: DateTime::from_timestamp_millis(agg.t)?,
        open: agg.o,
        high: agg.h,
        low: agg.l,
        close: agg.c,
        volume: agg.v,
    })
}

// =============================================================================
// Polygon API Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TickerDetailsResponse {
    #[serde(default)]
    results: Option<TickerDetailsResult>,
}

#[derive(Debug, Default, Deserialize)]
struct TickerDetailsResult {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    market: Option<String>,
    #[serde(default)]
    sic_description: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    market_cap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LastTradeResponse {
    #[serde(default)]
    results: Option<LastTradeResult>,
}

#[derive(Debug, Default, Deserialize)]
struct LastTradeResult {
    /// Trade price
    #[serde(default)]
    p: Option<f64>,
    /// Trade size
    #[serde(default)]
    s: Option<f64>,
    /// Trade timestamp in nanoseconds since the epoch
    #[serde(default)]
    t: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AggsResponse {
    #[serde(default)]
    results: Vec<AggBar>,
}

/// One daily aggregate row; `t` is milliseconds since the epoch.
#[derive(Debug, Deserialize)]
struct AggBar {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}
