//! Wire types for `GET /search` (REST).

use crate::error::HttpError;
use crate::shared::{ApiErrorBody, Symbol};
use serde::{Deserialize, Serialize};

/// One raw search match. Extra fields (volume, chart data) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatchBody {
    pub symbol: Symbol,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Either an ordered match list or an `{error}` envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Matches(Vec<SearchMatchBody>),
    Error(ApiErrorBody),
}

impl SearchResponse {
    pub fn into_result(self) -> Result<Vec<SearchMatchBody>, HttpError> {
        match self {
            SearchResponse::Matches(m) => Ok(m),
            SearchResponse::Error(e) => Err(HttpError::Api(e.error)),
        }
    }
}
