//! Conversion: QuoteBody → QuoteSnapshot.

use super::wire::QuoteBody;
use super::{PriceSeries, QuoteSnapshot};

impl From<QuoteBody> for QuoteSnapshot {
    fn from(body: QuoteBody) -> Self {
        Self {
            symbol: body.symbol,
            price: body.price,
            change: body.change,
            percent_change: body.percent_change,
            volume: body.volume,
            updated_at: body.updated_at.filter(|s| !s.trim().is_empty()),
            chart_data: body.chart_data.map(PriceSeries::new),
        }
    }
}
