//! Configuration values injected into the services.
//!
//! Nothing in this module reads the environment; the binary maps its
//! arguments (with environment fallbacks) onto these structs.

use std::time::Duration;

use jiff::tz::TimeZone;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default provider base URL; `/chat/completions` is appended.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default monthly generation allowance per user.
pub const DEFAULT_MONTHLY_LIMIT: u32 = 10;

/// Settings for the model client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer token for the provider; may be absent when `use_mock` is set
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// Total attempts for transient failures, first call included
    pub max_attempts: u32,
    /// Use the deterministic stand-in instead of the network
    pub use_mock: bool,
    /// Simulated latency of the stand-in
    pub mock_latency: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            max_attempts: 3,
            use_mock: false,
            mock_latency: Duration::ZERO,
        }
    }
}

/// Settings for monthly quota accounting.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    pub monthly_limit: u32,
    /// Zone whose calendar months bound the quota window
    pub time_zone: TimeZone,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            monthly_limit: DEFAULT_MONTHLY_LIMIT,
            time_zone: TimeZone::UTC,
        }
    }
}

/// Settings the worker runtime reads for a generation job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Top-level tries of the whole job
    pub max_attempts: u32,
    /// Wall-clock ceiling across all tries, backoff sleeps included
    pub timeout: Duration,
    /// Delay before try N+1 is `backoff[N-1]`; the last entry repeats
    pub backoff: Vec<Duration>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            timeout: Duration::from_secs(300),
            backoff: vec![Duration::from_secs(30), Duration::from_secs(60)],
        }
    }
}

impl JobConfig {
    /// Delay to wait after the given failed try (1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let index = usize::try_from(attempt.saturating_sub(1)).unwrap_or(usize::MAX);
        self.backoff
            .get(index)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_backoff_schedule_repeats_last_entry() {
        let config = JobConfig::default();
        assert_eq!(config.backoff_after(1), Duration::from_secs(30));
        assert_eq!(config.backoff_after(2), Duration::from_secs(60));
        assert_eq!(config.backoff_after(5), Duration::from_secs(60));

        let empty = JobConfig {
            backoff: vec![],
            ..JobConfig::default()
        };
        assert_eq!(empty.backoff_after(1), Duration::ZERO);
    }

    #[test]
    fn test_defaults() {
        let client = ClientConfig::default();
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.timeout, Duration::from_secs(120));
        assert_eq!(client.max_attempts, 3);

        let quota = QuotaConfig::default();
        assert_eq!(quota.monthly_limit, 10);
    }
}
