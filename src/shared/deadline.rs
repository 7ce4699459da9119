//! Runtime-agnostic request deadlines.
//!
//! Races a request against a `futures_timer::Delay`, so the same code bounds fetches
//! on native and in the browser (where reqwest has no timeout of its own).

use std::future::Future;
use std::time::Duration;

use futures_util::future::{self, Either};

use crate::error::{DashboardError, HttpError};

/// Resolve `request`, or fail with [`HttpError::Timeout`] once `timeout` elapses.
pub async fn with_deadline<F, T>(request: F, timeout: Duration) -> Result<T, DashboardError>
where
    F: Future<Output = Result<T, DashboardError>>,
{
    let request = std::pin::pin!(request);
    let deadline = futures_timer::Delay::new(timeout);

    match future::select(request, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(HttpError::Timeout.into()),
    }
}
