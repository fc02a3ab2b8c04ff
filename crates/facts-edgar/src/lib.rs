#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/sharpevision/facts/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR client.
//!
//! This crate provides:
//!
//! - Company facts documents from the EDGAR XBRL API
//! - Submissions metadata (name, exchanges, SIC description)
//! - Bulk ticker-to-CIK table snapshots
//!
//! # Example
//!
//! ```no_run
//! use facts_edgar::EdgarProvider;
//! use facts_core::{Cik, FactsProvider, extract_metrics};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
//!
//!     let cik = Cik::new("320193");
//!     let facts = provider.company_facts(&cik).await?;
//!     let metrics = extract_metrics(&facts);
//!     println!("Revenue: {:?}", metrics.revenue);
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use facts_core::{
    Cik, CompanyFacts, CompanyProfile, DataProvider, FactsError, FactsProvider, Result,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

mod cik;

pub use cik::COMPANY_TICKERS_URL;

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR client.
///
/// Fetches company facts and submissions metadata, with client-side rate
/// limiting per SEC requirements (max 10 requests/second).
#[derive(Debug)]
pub struct EdgarProvider {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

impl EdgarProvider {
    /// Create a new EDGAR client with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    ///
    /// # Example
    /// ```
    /// use facts_edgar::EdgarProvider;
    ///
    /// let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)");
    /// ```
    ///
    /// # Panics
    /// Panics if the underlying HTTP client cannot be constructed.
    #[must_use]
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self::with_client(client)
    }

    /// Create a new EDGAR client from a pre-configured reqwest client.
    ///
    /// The client must already carry an identifying user agent.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
        }
    }

    /// Make a rate-limited GET request and parse the JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        debug!("EDGAR request: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FactsError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FactsError::RateLimited {
                source: "SEC EDGAR".to_string(),
                retry_after: None,
            });
        }

        if !response.status().is_success() {
            return Err(FactsError::Network(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FactsError::Parse(e.to_string()))
    }
}

impl DataProvider for EdgarProvider {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    fn description(&self) -> &str {
        "SEC EDGAR client for XBRL company facts, submissions metadata, and CIK resolution"
    }
}

#[async_trait]
impl FactsProvider for EdgarProvider {
    async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts> {
        let url = format!("{EDGAR_BASE_URL}/api/xbrl/companyfacts/CIK{cik}.json");
        self.get_json(&url).await
    }

    async fn company_profile(&self, cik: &Cik) -> Result<CompanyProfile> {
        let url = format!("{EDGAR_BASE_URL}/submissions/CIK{cik}.json");
        let submissions: Submissions = self.get_json(&url).await?;

        Ok(CompanyProfile {
            cik: cik.clone(),
            name: submissions.name,
            exchanges: submissions.exchanges,
            sic: submissions.sic,
            sic_description: submissions.sic_description,
        })
    }
}

/// Company submissions/filings metadata from EDGAR.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Submissions {
    /// Registrant name
    name: String,
    /// List of exchanges
    #[serde(default)]
    exchanges: Vec<String>,
    /// SIC code
    #[serde(default)]
    sic: Option<String>,
    /// SIC description
    #[serde(default)]
    sic_description: Option<String>,
}
