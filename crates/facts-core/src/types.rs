//! Core data types for company fundamentals.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Ticker`] - Trading symbol
//! - [`Cik`] - SEC Central Index Key
//! - [`Metric`] - Canonical metric names
//! - [`Metrics`] - Normalized metric values for one entity
//! - [`CompanySnapshot`] - Metrics plus derived ratios for one ticker
//! - [`CikTable`] - Versioned ticker-to-CIK lookup snapshot
//! - [`CompanyProfile`] - Entity reference information
//! - [`OhlcvBar`], [`TickerDetails`], [`LastTrade`] - Market data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::ratio::Ratios;

/// A trading symbol/ticker.
///
/// Tickers are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    /// Creates a new ticker from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the ticker as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ticker {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// An SEC Central Index Key.
///
/// CIKs are stored zero-padded to the 10 digits the EDGAR endpoints expect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cik(String);

impl Cik {
    /// Creates a new CIK, zero-padding to 10 digits.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(format!("{:0>10}", s.into()))
    }

    /// Creates a CIK from the numeric form the bulk ticker file uses.
    #[must_use]
    pub fn from_number(n: u64) -> Self {
        Self(format!("{n:0>10}"))
    }

    /// Returns the zero-padded CIK as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Cik {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The canonical metrics extracted from a company facts document.
///
/// Using an enum rather than metric-name strings makes an invalid metric
/// request unrepresentable in calling code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Total revenue for the reporting period.
    Revenue,
    /// Net income (loss) for the reporting period.
    NetIncome,
    /// Total assets at the end of the period.
    TotalAssets,
    /// Total liabilities at the end of the period.
    TotalLiabilities,
}

impl Metric {
    /// All canonical metrics, in extraction order.
    pub const ALL: [Self; 4] = [
        Self::Revenue,
        Self::NetIncome,
        Self::TotalAssets,
        Self::TotalLiabilities,
    ];

    /// Returns the serialized name of this metric.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::NetIncome => "net_income",
            Self::TotalAssets => "total_assets",
            Self::TotalLiabilities => "total_liabilities",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized metric values for one entity.
///
/// Each field is independently optional: `None` means the value could not be
/// determined from the filings, which is distinct from a reported zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Latest annual revenue.
    pub revenue: Option<f64>,
    /// Latest annual net income.
    pub net_income: Option<f64>,
    /// Latest annual total assets.
    pub total_assets: Option<f64>,
    /// Latest annual total liabilities.
    pub total_liabilities: Option<f64>,
}

impl Metrics {
    /// Returns the value for a canonical metric.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Revenue => self.revenue,
            Metric::NetIncome => self.net_income,
            Metric::TotalAssets => self.total_assets,
            Metric::TotalLiabilities => self.total_liabilities,
        }
    }

    /// Sets the value for a canonical metric.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        match metric {
            Metric::Revenue => self.revenue = value,
            Metric::NetIncome => self.net_income = value,
            Metric::TotalAssets => self.total_assets = value,
            Metric::TotalLiabilities => self.total_liabilities = value,
        }
    }

    /// Returns true if no metric resolved to a value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.revenue.is_none()
            && self.net_income.is_none()
            && self.total_assets.is_none()
            && self.total_liabilities.is_none()
    }
}

/// Extracted metrics and derived ratios for one ticker.
///
/// Ratios are recomputed on every access rather than stored, so they always
/// reflect the metrics the snapshot was built from. A snapshot is constructed
/// once per extraction and discarded after serialization; there are no
/// mutation methods.
#[derive(Clone, Debug, PartialEq)]
pub struct CompanySnapshot {
    ticker: Ticker,
    metrics: Metrics,
}

impl CompanySnapshot {
    /// Creates a snapshot from a ticker and its extracted metrics.
    #[must_use]
    pub const fn new(ticker: Ticker, metrics: Metrics) -> Self {
        Self { ticker, metrics }
    }

    /// Returns the ticker this snapshot describes.
    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Returns the extracted metrics.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Computes the derived ratios from the current metrics.
    #[must_use]
    pub fn ratios(&self) -> Ratios {
        Ratios::from_metrics(&self.metrics)
    }
}

impl Serialize for CompanySnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        // Ratios are computed at serialization time, not read from state.
        let mut state = serializer.serialize_struct("CompanySnapshot", 3)?;
        state.serialize_field("ticker", &self.ticker)?;
        state.serialize_field("metrics", &self.metrics)?;
        state.serialize_field("ratios", &self.ratios())?;
        state.end()
    }
}

/// One row of the bulk ticker-to-CIK table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CikEntry {
    /// Zero-padded CIK.
    pub cik: Cik,
    /// Registrant name as published in the bulk file.
    pub title: String,
}

/// A versioned snapshot of the bulk ticker-to-CIK table.
///
/// A table is immutable once built; refreshing produces a new table rather
/// than mutating an existing one, so concurrent readers never observe a
/// partially updated mapping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CikTable {
    entries: HashMap<String, CikEntry>,
    fetched_at: DateTime<Utc>,
}

impl CikTable {
    /// Creates a table from ticker-keyed entries, stamped with the current time.
    #[must_use]
    pub fn new(entries: HashMap<String, CikEntry>) -> Self {
        Self {
            entries,
            fetched_at: Utc::now(),
        }
    }

    /// Looks up the CIK for a ticker.
    ///
    /// `None` is a normal outcome: not every symbol maps to a disclosing
    /// entity.
    #[must_use]
    pub fn lookup(&self, ticker: &Ticker) -> Option<&Cik> {
        self.entries.get(ticker.as_str()).map(|e| &e.cik)
    }

    /// Returns the full entry for a ticker, if present.
    #[must_use]
    pub fn entry(&self, ticker: &Ticker) -> Option<&CikEntry> {
        self.entries.get(ticker.as_str())
    }

    /// Iterates over all (ticker, entry) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CikEntry)> {
        self.entries.iter().map(|(t, e)| (t.as_str(), e))
    }

    /// Returns the number of tickers in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns when this snapshot was fetched from the bulk source.
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Entity reference information from the submissions endpoint.
///
/// The SIC description is surfaced as plain reference data; no sector
/// classification is derived from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Zero-padded CIK.
    pub cik: Cik,
    /// Registrant name.
    pub name: String,
    /// Exchanges the entity lists on.
    pub exchanges: Vec<String>,
    /// SIC code, when published.
    pub sic: Option<String>,
    /// SIC description, when published.
    pub sic_description: Option<String>,
}

/// OHLCV (Open, High, Low, Close, Volume) bar data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Timestamp of the bar.
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: f64,
    /// Highest price during the period.
    pub high: f64,
    /// Lowest price during the period.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Trading volume.
    pub volume: f64,
}

/// Basic reference details for a traded ticker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerDetails {
    /// Company name.
    pub name: Option<String>,
    /// Market the ticker trades on.
    pub market: Option<String>,
    /// Sector description (source-provided, low confidence).
    pub sector: Option<String>,
    /// Industry description.
    pub industry: Option<String>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
}

/// The most recent trade for a ticker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LastTrade {
    /// Trade price.
    pub price: Option<f64>,
    /// Trade size.
    pub size: Option<f64>,
    /// Trade timestamp.
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_uppercased() {
        let ticker = Ticker::new("aapl");
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(Ticker::new("MSFT").as_str(), "MSFT");
    }

    #[test]
    fn cik_is_zero_padded() {
        assert_eq!(Cik::new("320193").as_str(), "0000320193");
        assert_eq!(Cik::from_number(320_193).as_str(), "0000320193");
        assert_eq!(Cik::new("0000320193").as_str(), "0000320193");
    }

    #[test]
    fn metrics_get_set_round_trip() {
        let mut metrics = Metrics::default();
        assert!(metrics.is_empty());

        metrics.set(Metric::Revenue, Some(1000.0));
        metrics.set(Metric::TotalAssets, None);
        assert_eq!(metrics.get(Metric::Revenue), Some(1000.0));
        assert_eq!(metrics.get(Metric::TotalAssets), None);
        assert!(!metrics.is_empty());
    }

    #[test]
    fn snapshot_serializes_ticker_metrics_and_ratios() {
        let metrics = Metrics {
            revenue: Some(1000.0),
            net_income: Some(100.0),
            ..Default::default()
        };
        let snapshot = CompanySnapshot::new(Ticker::new("AAPL"), metrics);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["ticker"], "AAPL");
        assert_eq!(value["metrics"]["revenue"], 1000.0);
        assert_eq!(value["metrics"]["total_assets"], serde_json::Value::Null);
        assert_eq!(value["ratios"]["gross_margin"], 10.0);
        assert_eq!(value["ratios"]["revenue_growth"], serde_json::Value::Null);
        assert_eq!(value["ratios"]["debt_to_equity"], serde_json::Value::Null);
    }

    #[test]
    fn snapshot_ratios_follow_metrics() {
        let snapshot = CompanySnapshot::new(
            Ticker::new("AAPL"),
            Metrics {
                revenue: Some(200.0),
                net_income: Some(50.0),
                ..Default::default()
            },
        );
        assert_eq!(snapshot.ratios().gross_margin, Some(25.0));
    }

    #[test]
    fn cik_table_lookup() {
        let mut entries = HashMap::new();
        entries.insert(
            "AAPL".to_string(),
            CikEntry {
                cik: Cik::from_number(320_193),
                title: "Apple Inc.".to_string(),
            },
        );
        let table = CikTable::new(entries);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup(&Ticker::new("aapl")).map(Cik::as_str),
            Some("0000320193")
        );
        assert!(table.lookup(&Ticker::new("ZZZZ")).is_none());
    }
}
