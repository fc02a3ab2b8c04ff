//! Error types for fundamental data operations.
//!
//! This module defines [`FactsError`] which covers the failure cases that can
//! occur when fetching, parsing, or caching company data. Missing data is
//! never an error: concepts without qualifying facts surface as `None` in the
//! extracted metrics, per metric, and only transport, decoding, and cache
//! failures reach this type.

/// Errors that can occur during fundamental data operations.
#[derive(Debug)]
pub enum FactsError {
    /// Network-related errors (connection failures, timeouts, etc.).
    Network(String),

    /// Rate limit exceeded at an upstream source.
    RateLimited {
        /// The upstream source that rate limited the request.
        source: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested ticker does not map to a disclosing entity.
    TickerNotFound(String),

    /// Error decoding data from an upstream source.
    Parse(String),

    /// Error interacting with the cache.
    Cache(String),

    /// An invalid parameter was provided.
    InvalidParameter(String),

    /// Any other error.
    Other(String),
}

// Implemented by hand rather than derived with `thiserror` because the
// `RateLimited::source` field names the upstream data source (a `String`),
// which the derive would otherwise require to be an error type.
impl std::fmt::Display for FactsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {msg}"),
            Self::RateLimited {
                source,
                retry_after,
            } => write!(f, "Rate limited by {source}: retry after {retry_after:?}"),
            Self::TickerNotFound(ticker) => write!(f, "Ticker not found: {ticker}"),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
            Self::Cache(msg) => write!(f, "Cache error: {msg}"),
            Self::InvalidParameter(msg) => write!(f, "Invalid parameter: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FactsError {}

/// Result type alias using [`FactsError`].
pub type Result<T> = std::result::Result<T, FactsError>;
