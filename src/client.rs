//! High-level client: `DashboardClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the resolved configuration, and accessor methods.

use crate::config::{DashboardConfig, LiveConfig, QuoteEndpoint};
use crate::domain::quote::client::Quotes;
use crate::domain::search::client::Search;
use crate::error::DashboardError;
use crate::http::{DashboardHttp, RetryPolicy};

use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::quote::client::Quotes as QuotesClient;
pub use crate::domain::search::client::Search as SearchClient;

/// The primary entry point for talking to the dashboard API.
///
/// Provides nested sub-client accessors: `client.quotes()`, `client.search()`.
#[derive(Clone)]
pub struct DashboardClient {
    pub(crate) http: DashboardHttp,
    pub(crate) config: DashboardConfig,
}

impl DashboardClient {
    pub fn builder() -> DashboardClientBuilder {
        DashboardClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn quotes(&self) -> Quotes<'_> {
        Quotes { client: self }
    }

    pub fn search(&self) -> Search<'_> {
        Search { client: self }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Settings for an update loop driven by this client.
    pub fn live_config(&self) -> LiveConfig {
        self.config.live()
    }

    pub fn http(&self) -> &DashboardHttp {
        &self.http
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct DashboardClientBuilder {
    config: DashboardConfig,
    quote_retry: Option<RetryPolicy>,
}

impl DashboardClientBuilder {
    /// Start from a full configuration (e.g. `DashboardConfig::from_env()`).
    pub fn config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    pub fn quote_endpoint(mut self, endpoint: QuoteEndpoint) -> Self {
        self.config.quote_endpoint = endpoint;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn flash_duration(mut self, duration: Duration) -> Self {
        self.config.flash_duration = duration;
        self
    }

    pub fn search_debounce(mut self, debounce: Duration) -> Self {
        self.config.search_debounce = debounce;
        self
    }

    /// Retry policy for quote fetches. Defaults to a single attempt per tick.
    pub fn quote_retry(mut self, policy: RetryPolicy) -> Self {
        self.quote_retry = Some(policy);
        self
    }

    pub fn build(self) -> Result<DashboardClient, DashboardError> {
        self.config.validate()?;

        let http = DashboardHttp::new(&self.config.base_url, self.config.request_timeout)?
            .with_quote_endpoint(self.config.quote_endpoint)
            .with_quote_retry(self.quote_retry.unwrap_or(RetryPolicy::None));

        tracing::debug!(
            base_url = http.base_url(),
            endpoint = ?self.config.quote_endpoint,
            "Built dashboard client"
        );

        Ok(DashboardClient {
            http,
            config: self.config,
        })
    }
}
