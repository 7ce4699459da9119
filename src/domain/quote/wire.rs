//! Wire types for quote responses (REST).

use crate::error::HttpError;
use crate::shared::{ApiErrorBody, Symbol};
use serde::{Deserialize, Serialize};

/// Raw `GET /api/stock/{symbol}/latest` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
    #[serde(
        default,
        deserialize_with = "crate::shared::serde_util::volume::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<Vec<f64>>,
}

/// Either a quote or an `{error}` envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QuoteResponse {
    Error(ApiErrorBody),
    Quote(QuoteBody),
}

impl QuoteResponse {
    pub fn into_result(self) -> Result<QuoteBody, HttpError> {
        match self {
            QuoteResponse::Quote(body) => Ok(body),
            QuoteResponse::Error(e) => Err(HttpError::Api(e.error)),
        }
    }
}
