//! Bulk ticker-to-CIK table refresh.
//!
//! The SEC publishes the full ticker-to-CIK mapping as a single bulk file.
//! Refreshing it produces a fresh [`CikTable`] snapshot; callers swap in the
//! new table and keep serving lookups from the old one in the meantime.

use async_trait::async_trait;
use facts_core::{Cik, CikEntry, CikSource, CikTable, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::EdgarProvider;

/// SEC company tickers bulk file URL.
pub const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// One row of the bulk company tickers file.
#[derive(Debug, Deserialize)]
struct CompanyTickerRow {
    /// CIK as a number (SEC publishes this as an integer)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
    /// Registrant name
    title: String,
}

/// Builds a table snapshot from decoded bulk-file rows.
///
/// The bulk file is keyed by meaningless row indices; the table is re-keyed
/// by uppercased ticker.
fn build_table(rows: HashMap<String, CompanyTickerRow>) -> CikTable {
    let entries = rows
        .into_values()
        .map(|row| {
            (
                row.ticker.to_uppercase(),
                CikEntry {
                    cik: Cik::from_number(row.cik_str),
                    title: row.title,
                },
            )
        })
        .collect();
    CikTable::new(entries)
}

#[async_trait]
impl CikSource for EdgarProvider {
    async fn fetch_cik_table(&self) -> Result<CikTable> {
        let rows: HashMap<String, CompanyTickerRow> =
            self.get_json(COMPANY_TICKERS_URL).await?;

        let table = build_table(rows);
        debug!("Fetched CIK table with {} tickers", table.len());
        Ok(table)
    }
}
