//! Search sub-client: symbol lookup.

use crate::client::DashboardClient;
use crate::domain::search::SearchMatch;
use crate::error::DashboardError;

/// Sub-client for search operations.
pub struct Search<'a> {
    pub(crate) client: &'a DashboardClient,
}

impl<'a> Search<'a> {
    /// Run a search. A blank query short-circuits to no results without a request.
    pub async fn query(&self, query: &str) -> Result<Vec<SearchMatch>, DashboardError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let matches = self.client.http.search(query).await?;
        Ok(matches.into_iter().map(SearchMatch::from).collect())
    }
}
