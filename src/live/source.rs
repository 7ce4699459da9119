//! Where the update loop gets its quotes.

use std::future::Future;
use std::time::Duration;

use crate::domain::quote::QuoteSnapshot;
use crate::error::DashboardError;
use crate::shared::deadline::with_deadline;
use crate::shared::{MaybeSend, Symbol};

/// Something that can fetch the latest snapshot for a symbol.
///
/// `DashboardClient` is the production source; tests supply scripted ones.
pub trait QuoteSource {
    fn latest(
        &self,
        symbol: &Symbol,
    ) -> impl Future<Output = Result<QuoteSnapshot, DashboardError>> + MaybeSend;
}

impl<Q: QuoteSource + ?Sized> QuoteSource for std::sync::Arc<Q> {
    fn latest(
        &self,
        symbol: &Symbol,
    ) -> impl Future<Output = Result<QuoteSnapshot, DashboardError>> + MaybeSend {
        (**self).latest(symbol)
    }
}

#[cfg(feature = "http")]
impl QuoteSource for crate::client::DashboardClient {
    fn latest(
        &self,
        symbol: &Symbol,
    ) -> impl Future<Output = Result<QuoteSnapshot, DashboardError>> + MaybeSend {
        async move { self.quotes().latest(symbol).await }
    }
}

/// Fetch with a deadline. Expiry is reported as `HttpError::Timeout`.
pub async fn fetch_quote<Q>(
    source: &Q,
    symbol: &Symbol,
    timeout: Duration,
) -> Result<QuoteSnapshot, DashboardError>
where
    Q: QuoteSource + ?Sized,
{
    with_deadline(source.latest(symbol), timeout).await
}
