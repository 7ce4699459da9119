//! Retry policies for dashboard requests.
//!
//! Polling already repeats every few seconds, so nothing retries by default; a caller
//! can opt a client into [`RetryPolicy::Idempotent`] or a custom schedule.

use std::time::Duration;

use crate::error::HttpError;

/// How a request reacts to a transient failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryPolicy {
    /// Single attempt. The next poll tick (or keystroke) is the retry.
    #[default]
    None,
    /// Short backoff on transport failures, timeouts, 429 and 502/503/504.
    Idempotent,
    Custom(RetryConfig),
}

/// Backoff schedule for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Random spread applied to each delay, as a fraction of it (`0.25` = ±25%).
    pub jitter: f64,
    /// Status codes worth another attempt.
    pub retry_on: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    /// Bounded well below the default poll interval.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(150),
            max_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
            jitter: 0.25,
            retry_on: vec![429, 502, 503, 504],
        }
    }

    /// `None` when the policy makes a single attempt.
    pub fn for_policy(policy: &RetryPolicy) -> Option<Self> {
        match policy {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(Self::idempotent()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }

    /// Total attempts including the first.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether `err` is transient under this schedule.
    pub fn should_retry(&self, err: &HttpError) -> bool {
        match err {
            HttpError::ServerError { status, .. } => self.retry_on.contains(status),
            HttpError::RateLimited { .. } => self.retry_on.contains(&429),
            HttpError::Timeout => true,
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => {
                #[cfg(not(target_arch = "wasm32"))]
                let transient = e.is_connect() || e.is_timeout() || e.is_request();
                #[cfg(target_arch = "wasm32")]
                let transient = e.is_timeout() || e.is_request();
                transient
            }
            _ => false,
        }
    }

    /// Delay before retry number `attempt` (0-based): exponential, capped, jittered.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let scaled_ms = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(exponent);
        let capped_ms = scaled_ms.min(self.max_delay.as_millis() as f64);

        let spread_ms = if self.jitter > 0.0 {
            capped_ms * self.jitter * (rand::random::<f64>() * 2.0 - 1.0)
        } else {
            0.0
        };

        Duration::from_millis((capped_ms + spread_ms).max(0.0).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64, factor: f64) -> RetryConfig {
        RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_factor: factor,
            jitter: 0.0,
            retry_on: vec![503],
        }
    }

    #[test]
    fn test_policy_default_is_single_attempt() {
        assert_eq!(RetryPolicy::default(), RetryPolicy::None);
        assert_eq!(RetryConfig::for_policy(&RetryPolicy::None), None);
    }

    #[test]
    fn test_for_policy_resolves_schedules() {
        assert_eq!(
            RetryConfig::for_policy(&RetryPolicy::Idempotent),
            Some(RetryConfig::idempotent())
        );
        let custom = fixed(10, 20, 1.0);
        assert_eq!(
            RetryConfig::for_policy(&RetryPolicy::Custom(custom.clone())),
            Some(custom)
        );
    }

    #[test]
    fn test_idempotent_total_backoff_under_poll_interval() {
        let config = RetryConfig {
            jitter: 0.0,
            ..RetryConfig::idempotent()
        };
        let total: Duration = (0..config.max_retries).map(|a| config.delay_for_attempt(a)).sum();
        assert!(total < Duration::from_secs(3));
        assert_eq!(config.attempts(), 3);
    }

    #[test]
    fn test_delay_grows_then_caps() {
        let config = fixed(100, 350, 2.0);
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(350));
        assert_eq!(config.delay_for_attempt(40), Duration::from_millis(350));
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let config = RetryConfig {
            jitter: 0.25,
            ..fixed(400, 400, 1.0)
        };
        for _ in 0..50 {
            let d = config.delay_for_attempt(0).as_millis();
            assert!((300..=500).contains(&d), "{d}");
        }
    }

    #[test]
    fn test_should_retry_classification() {
        let config = fixed(1, 1, 1.0);
        assert!(config.should_retry(&HttpError::Timeout));
        assert!(config.should_retry(&HttpError::ServerError {
            status: 503,
            body: String::new()
        }));
        assert!(!config.should_retry(&HttpError::ServerError {
            status: 500,
            body: String::new()
        }));
        assert!(!config.should_retry(&HttpError::RateLimited { retry_after_ms: None }));
        assert!(!config.should_retry(&HttpError::NotFound("x".into())));
        assert!(RetryConfig::idempotent().should_retry(&HttpError::RateLimited {
            retry_after_ms: Some(10)
        }));
    }
}
