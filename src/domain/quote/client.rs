//! Quotes sub-client: latest snapshot per symbol.

use crate::client::DashboardClient;
use crate::domain::quote::QuoteSnapshot;
use crate::error::DashboardError;
use crate::shared::Symbol;

/// Sub-client for quote operations.
pub struct Quotes<'a> {
    pub(crate) client: &'a DashboardClient,
}

impl<'a> Quotes<'a> {
    /// Fetch the latest snapshot for `symbol`.
    pub async fn latest(&self, symbol: &Symbol) -> Result<QuoteSnapshot, DashboardError> {
        let body = self.client.http.get_latest_quote(symbol).await?;
        let mut snapshot: QuoteSnapshot = body.into();
        if snapshot.symbol.is_none() {
            snapshot.symbol = Some(symbol.clone());
        }
        Ok(snapshot)
    }
}
