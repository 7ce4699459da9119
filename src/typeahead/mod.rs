//! Debounced symbol search.
//!
//! [`crate::domain::search::SearchState`] decides *what* the panel shows; this module
//! supplies the source it queries and (on native) the task that owns the debounce
//! timer and in-flight requests. The browser binding lives in `dom::search`.

#[cfg(feature = "native")]
pub mod native;

use std::future::Future;
use std::time::Duration;

use crate::domain::search::SearchMatch;
use crate::error::{DashboardError, HttpError};
use crate::shared::deadline::with_deadline;
use crate::shared::MaybeSend;

/// Something that can answer a symbol search.
pub trait SearchSource {
    fn search_symbols(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchMatch>, DashboardError>> + MaybeSend;
}

impl<S: SearchSource + ?Sized> SearchSource for std::sync::Arc<S> {
    fn search_symbols(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchMatch>, DashboardError>> + MaybeSend {
        (**self).search_symbols(query)
    }
}

#[cfg(feature = "http")]
impl SearchSource for crate::client::DashboardClient {
    fn search_symbols(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchMatch>, DashboardError>> + MaybeSend {
        async move { self.search().query(query).await }
    }
}

/// Search with a deadline. Expiry is reported as `HttpError::Timeout`.
pub async fn search_with_deadline<S>(
    source: &S,
    query: &str,
    timeout: Duration,
) -> Result<Vec<SearchMatch>, DashboardError>
where
    S: SearchSource + ?Sized,
{
    with_deadline(source.search_symbols(query), timeout).await
}

/// Text shown in the panel when a search fails.
pub fn failure_message(error: &DashboardError) -> String {
    match error {
        DashboardError::Http(HttpError::Api(message)) => message.clone(),
        DashboardError::Http(HttpError::ServerError { status, .. }) => {
            format!("Search failed: HTTP {}", status)
        }
        DashboardError::Http(HttpError::NotFound(_)) => "Search failed: HTTP 404".to_string(),
        DashboardError::Http(e) if e.is_timeout() => "Search timed out".to_string(),
        _ => "Error performing search".to_string(),
    }
}
