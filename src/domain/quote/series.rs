//! Price series: the ordered samples a sparkline is drawn from.

use crate::error::ChartDataError;
use serde::{Deserialize, Serialize};

/// Ordered price samples, oldest first.
///
/// Insertion order is chronological order; duplicates are fine. The series is
/// ephemeral: it lives for one render call or one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn new(samples: Vec<f64>) -> Self {
        Self(samples)
    }

    /// Parse the JSON array a card embeds in its `data-chart` attribute.
    ///
    /// A blank payload is an empty series, matching cards rendered without history.
    pub fn from_embedded_json(payload: &str) -> Result<Self, ChartDataError> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str::<Vec<f64>>(payload)
            .map(Self)
            .map_err(ChartDataError::Malformed)
    }

    pub fn samples(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(samples: Vec<f64>) -> Self {
        Self(samples)
    }
}

impl AsRef<[f64]> for PriceSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
