//! Conversion: SearchMatchBody → SearchMatch.

use super::wire::SearchMatchBody;
use super::SearchMatch;

impl From<SearchMatchBody> for SearchMatch {
    fn from(body: SearchMatchBody) -> Self {
        Self {
            symbol: body.symbol,
            price: body.price,
            change: body.change,
            percent_change: body.percent_change,
            updated_at: body.updated_at.unwrap_or_default(),
        }
    }
}
