//! Detail-page price history embedded in `data-history`.

use super::PriceSeries;
use crate::error::ChartDataError;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the detail page's history payload.
///
/// The page template emits `{date, price}`; older templates used `{Date, Close}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(alias = "Date")]
    pub date: String,
    #[serde(alias = "Close")]
    pub price: f64,
}

impl HistoryPoint {
    /// Parse `date` as either `YYYY-MM-DD HH:MM:SS` or RFC 3339.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT)
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(&self.date)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
    }

    /// Axis label: wall-clock time, or the raw date when unparseable.
    pub fn label(&self) -> String {
        match self.timestamp() {
            Some(ts) => ts.format("%H:%M:%S").to_string(),
            None => self.date.clone(),
        }
    }
}

/// Parsed detail-page history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    points: Vec<HistoryPoint>,
}

impl PriceHistory {
    pub fn from_embedded_json(payload: &str) -> Result<Self, ChartDataError> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Ok(Self::default());
        }
        let points = serde_json::from_str::<Vec<HistoryPoint>>(payload)
            .map_err(ChartDataError::MalformedHistory)?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[HistoryPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn series(&self) -> PriceSeries {
        PriceSeries::new(self.points.iter().map(|p| p.price).collect())
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(HistoryPoint::label).collect()
    }
}
