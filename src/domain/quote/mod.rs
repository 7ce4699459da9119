//! Quote domain: point-in-time snapshots and the price series they carry.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod history;
pub mod series;
pub mod wire;

use crate::shared::{Direction, Symbol};
use serde::{Deserialize, Serialize};

pub use history::{HistoryPoint, PriceHistory};
pub use series::PriceSeries;

/// One point-in-time read of a symbol's price, volume, and recent trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: Option<Symbol>,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub volume: Option<u64>,
    pub updated_at: Option<String>,
    pub chart_data: Option<PriceSeries>,
}

impl QuoteSnapshot {
    pub fn direction(&self) -> Direction {
        Direction::from_change(self.change)
    }
}
