//! Provider traits for fetching company and market data.
//!
//! This module defines the seams implemented by the collaborator crates:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`FactsProvider`] - Company facts and submissions metadata
//! - [`CikSource`] - Bulk ticker-to-CIK table refresh
//! - [`MarketDataProvider`] - Ticker details, trades, and daily bars

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{Cik, CikTable, CompanyProfile, LastTrade, OhlcvBar, Ticker, TickerDetails},
    xbrl::CompanyFacts,
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for company disclosure data.
#[async_trait]
pub trait FactsProvider: DataProvider {
    /// Fetches the full company facts document for an entity.
    async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts>;

    /// Fetches reference information from the entity's submissions metadata.
    async fn company_profile(&self, cik: &Cik) -> Result<CompanyProfile>;
}

/// Provider for the bulk ticker-to-CIK table.
#[async_trait]
pub trait CikSource: DataProvider {
    /// Fetches a fresh snapshot of the ticker-to-CIK table.
    ///
    /// Each call produces a new [`CikTable`]; existing snapshots are never
    /// mutated, so readers can keep using an old table during a refresh.
    async fn fetch_cik_table(&self) -> Result<CikTable>;
}

/// Provider for market data.
#[async_trait]
pub trait MarketDataProvider: DataProvider {
    /// Fetches basic reference details for a ticker.
    async fn ticker_details(&self, ticker: &Ticker) -> Result<TickerDetails>;

    /// Fetches the most recent trade for a ticker.
    async fn last_trade(&self, ticker: &Ticker) -> Result<LastTrade>;

    /// Fetches daily OHLCV bars covering the trailing `days` calendar days.
    async fn daily_bars(&self, ticker: &Ticker, days: u32) -> Result<Vec<OhlcvBar>>;
}
