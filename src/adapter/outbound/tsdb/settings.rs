//! TheSportsDB client settings.

use std::time::Duration;

/// Default v1 JSON API root; the API key is appended as a path segment.
pub const DEFAULT_BASE_URL: &str = "https://www.thesportsdb.com/api/v1/json";

/// User agent sent with every request.
pub const USER_AGENT: &str = "rugby-analytics/tsdb-client";

/// HTTP and retry settings for [`TsdbClient`](super::TsdbClient).
#[derive(Debug, Clone, PartialEq)]
pub struct TsdbSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl Default for TsdbSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 45,
            connect_timeout_secs: 10,
            retry: RetryPolicy::default(),
        }
    }
}

/// Exponential backoff applied to retryable responses of a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub multiplier: f64,
}

impl RetryPolicy {
    /// No sleeping between attempts; used by tests.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms: 0,
            multiplier: 1.0,
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.initial_backoff_ms as f64 * self.multiplier.powi(exponent);
        Duration::from_millis(millis.round() as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_backoff_ms: 800,
            multiplier: 1.8,
        }
    }
}
