//! Dashboard configuration: endpoints, cadences, timeouts.
//!
//! Defaults match the canonical dashboard contract (`/api/stock/{symbol}/latest`,
//! 3 second polling, 1 second price flash, 300ms search debounce). Every value can be
//! overridden with the builder methods or the `QUOTEBOARD_*` environment variables.

use crate::error::DashboardError;
use crate::network;
use crate::shared::Symbol;
use std::time::Duration;

pub const ENV_API_URL: &str = "QUOTEBOARD_API_URL";
pub const ENV_QUOTE_ENDPOINT: &str = "QUOTEBOARD_QUOTE_ENDPOINT";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "QUOTEBOARD_REQUEST_TIMEOUT_MS";
pub const ENV_POLL_INTERVAL_MS: &str = "QUOTEBOARD_POLL_INTERVAL_MS";
pub const ENV_FLASH_MS: &str = "QUOTEBOARD_FLASH_MS";
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "QUOTEBOARD_SEARCH_DEBOUNCE_MS";

/// Which path serves per-symbol quote snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteEndpoint {
    /// `GET /api/stock/{symbol}/latest`
    #[default]
    Latest,
    /// `GET /stock/{symbol}`
    StockPage,
}

impl QuoteEndpoint {
    pub fn path(&self, symbol: &Symbol) -> String {
        let template = match self {
            QuoteEndpoint::Latest => network::LATEST_QUOTE_PATH,
            QuoteEndpoint::StockPage => network::STOCK_PAGE_PATH,
        };
        template.replace("{symbol}", &urlencoding::encode(symbol.as_str()))
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Some(QuoteEndpoint::Latest),
            "stock-page" | "stock_page" | "stock" => Some(QuoteEndpoint::StockPage),
            _ => None,
        }
    }
}

/// Settings for the live update loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveConfig {
    pub poll_interval: Duration,
    pub flash_duration: Duration,
    /// Per-fetch deadline; expiry counts as a failed fetch.
    pub fetch_timeout: Duration,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            flash_duration: Duration::from_millis(1000),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl LiveConfig {
    /// Wait before the next tick when the last one took `elapsed`.
    ///
    /// A tick that overran the interval is followed immediately, and the schedule
    /// restarts from there; missed ticks are never replayed.
    pub fn delay_until_next_tick(&self, elapsed: Duration) -> Duration {
        self.poll_interval.saturating_sub(elapsed)
    }
}

/// Full dashboard configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub quote_endpoint: QuoteEndpoint,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub flash_duration: Duration,
    pub search_debounce: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let live = LiveConfig::default();
        Self {
            base_url: network::DEFAULT_API_URL.to_string(),
            quote_endpoint: QuoteEndpoint::default(),
            request_timeout: live.fetch_timeout,
            poll_interval: live.poll_interval,
            flash_duration: live.flash_duration,
            search_debounce: Duration::from_millis(300),
        }
    }
}

impl DashboardConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides from an arbitrary key lookup. Unset keys keep their defaults;
    /// set-but-malformed keys are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DashboardError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.base_url = url;
        }
        if let Some(name) = lookup(ENV_QUOTE_ENDPOINT) {
            config.quote_endpoint = QuoteEndpoint::from_name(&name).ok_or_else(|| {
                DashboardError::Config(format!("{}: unknown endpoint {:?}", ENV_QUOTE_ENDPOINT, name))
            })?;
        }
        if let Some(d) = millis(&lookup, ENV_REQUEST_TIMEOUT_MS)? {
            config.request_timeout = d;
        }
        if let Some(d) = millis(&lookup, ENV_POLL_INTERVAL_MS)? {
            config.poll_interval = d;
        }
        if let Some(d) = millis(&lookup, ENV_FLASH_MS)? {
            config.flash_duration = d;
        }
        if let Some(d) = millis(&lookup, ENV_SEARCH_DEBOUNCE_MS)? {
            config.search_debounce = d;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.base_url.trim().is_empty() {
            return Err(DashboardError::Config("base URL is empty".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(DashboardError::Config("poll interval must be non-zero".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(DashboardError::Config("request timeout must be non-zero".into()));
        }
        Ok(())
    }

    pub fn live(&self) -> LiveConfig {
        LiveConfig {
            poll_interval: self.poll_interval,
            flash_duration: self.flash_duration,
            fetch_timeout: self.request_timeout,
        }
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, DashboardError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| DashboardError::Config(format!("{}: {} ({:?})", key, e, raw))),
    }
}
