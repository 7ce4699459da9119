//! Low-level HTTP client: `DashboardHttp`.
//!
//! One method per dashboard endpoint. Returns wire types (conversion to domain types
//! happens in the sub-clients). `DashboardClient` wraps this.

use crate::config::QuoteEndpoint;
use crate::domain::quote::wire::{QuoteBody, QuoteResponse};
use crate::domain::search::wire::{SearchMatchBody, SearchResponse};
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::network;
use crate::shared::Symbol;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for the dashboard REST API.
#[derive(Clone)]
pub struct DashboardHttp {
    base_url: String,
    client: Client,
    quote_endpoint: QuoteEndpoint,
    quote_retry: RetryPolicy,
}

impl DashboardHttp {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(request_timeout)
                .pool_max_idle_per_host(10);
        }
        // No client-side timeout in the browser; callers race `shared::deadline` instead.
        #[cfg(target_arch = "wasm32")]
        let _ = request_timeout;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            quote_endpoint: QuoteEndpoint::default(),
            quote_retry: RetryPolicy::None,
        })
    }

    pub fn with_quote_endpoint(mut self, endpoint: QuoteEndpoint) -> Self {
        self.quote_endpoint = endpoint;
        self
    }

    pub fn with_quote_retry(mut self, policy: RetryPolicy) -> Self {
        self.quote_retry = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a symbol's detail page.
    pub fn detail_url(&self, symbol: &Symbol) -> String {
        format!("{}{}", self.base_url, network::detail_path(symbol.as_str()))
    }

    // ── Quotes ───────────────────────────────────────────────────────────

    pub async fn get_latest_quote(&self, symbol: &Symbol) -> Result<QuoteBody, HttpError> {
        let url = format!("{}{}", self.base_url, self.quote_endpoint.path(symbol));
        let resp: QuoteResponse = self.get(&url, self.quote_retry.clone()).await?;
        resp.into_result()
    }

    // ── Search ───────────────────────────────────────────────────────────

    pub async fn search(&self, query: &str) -> Result<Vec<SearchMatchBody>, HttpError> {
        let url = format!(
            "{}{}?q={}",
            self.base_url,
            network::SEARCH_PATH,
            urlencoding::encode(query)
        );
        let resp: SearchResponse = self.get(&url, RetryPolicy::None).await?;
        resp.into_result()
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let Some(config) = RetryConfig::for_policy(&retry) else {
            return self.do_get(url).await;
        };

        let mut attempt = 0;
        loop {
            let err = match self.do_get::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };

            if !config.should_retry(&err) {
                return Err(err);
            }
            if attempt >= config.max_retries {
                return Err(HttpError::MaxRetriesExceeded {
                    attempts: config.attempts(),
                    last_error: err.to_string(),
                });
            }

            let delay = match &err {
                HttpError::RateLimited {
                    retry_after_ms: Some(ms),
                } => Duration::from_millis(*ms).min(config.max_delay),
                _ => config.delay_for_attempt(attempt),
            };
            tracing::debug!(
                url,
                attempt = attempt + 1,
                max = config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying request"
            );
            futures_timer::Delay::new(delay).await;
            attempt += 1;
        }
    }

    async fn do_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(classify)?;
        let status = resp.status();

        if status.is_success() {
            return resp.json::<T>().await.map_err(classify);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs * 1000);
        let body_text = resp.text().await.unwrap_or_default();
        let message = api_error_message(&body_text).unwrap_or(body_text);

        match status_code {
            404 => Err(HttpError::NotFound(message)),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(message)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: message,
            }),
        }
    }
}

/// Fold transport timeouts into `HttpError::Timeout`.
fn classify(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}

/// Pull the message out of an `{"error": "..."}` body.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<crate::shared::ApiErrorBody>(body)
        .ok()
        .map(|b| b.error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let http = DashboardHttp::new("http://dash.local/", Duration::from_secs(1)).unwrap();
        assert_eq!(http.base_url(), "http://dash.local");
        assert_eq!(
            http.detail_url(&Symbol::from("NFLX")),
            "http://dash.local/stock/NFLX"
        );
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"error":"Stock not found"}"#).as_deref(),
            Some("Stock not found")
        );
        assert_eq!(api_error_message("<html>oops</html>"), None);
    }
}
