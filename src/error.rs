//! Unified dashboard error types.

use thiserror::Error;

/// Top-level dashboard error.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Chart data error: {0}")]
    ChartData(#[from] ChartDataError),

    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The endpoint answered 2xx with an `{"error": ...}` body.
    #[error("API error: {0}")]
    Api(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Errors decoding a price series (embedded card payloads, `chart_data`).
#[derive(Error, Debug)]
pub enum ChartDataError {
    #[error("Malformed chart payload: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Malformed history payload: {0}")]
    MalformedHistory(#[source] serde_json::Error),
}

/// Errors applying an update to a quote card.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardError {
    #[error("Card for {symbol} is missing elements: {missing:?}")]
    MissingElements {
        symbol: String,
        missing: Vec<crate::live::CardElement>,
    },

    #[error("Card has no symbol")]
    MissingSymbol,
}

impl HttpError {
    /// Whether the failure came from the transport deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            HttpError::Timeout => true,
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => e.is_timeout(),
            _ => false,
        }
    }
}
