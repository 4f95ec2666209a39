//! Bounded exponential backoff around provider calls.

use std::{future::Future, time::Duration};

use crate::error::Result;

/// Retry schedule for transient provider failures.
///
/// Attempts are counted from 1. After failed attempt `n` the policy waits
/// `delay_unit * min(2^n, max_delay_factor)` before trying again.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, first call included
    pub max_attempts: u32,
    pub delay_unit: Duration,
    pub max_delay_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_unit: Duration::from_secs(1),
            max_delay_factor: 60,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Scales every delay; tests use milliseconds instead of seconds.
    pub fn with_delay_unit(mut self, unit: Duration) -> Self {
        self.delay_unit = unit;
        self
    }

    /// Delay to wait after the given failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32
            .checked_pow(attempt)
            .unwrap_or(u32::MAX)
            .min(self.max_delay_factor);
        self.delay_unit.saturating_mul(factor)
    }

    /// Runs `operation` until it succeeds, fails permanently, or the
    /// attempt budget is spent. The closure receives the 1-based attempt.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.delay_for(attempt);
                    log::warn!(
                        "Retrying model request: attempt={attempt}/{max_attempts} delay_ms={} kind={} error={e}",
                        delay.as_millis(),
                        e.kind()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if e.is_transient() {
                        log::error!(
                            "Model request failed after {attempt} attempts: kind={} error={e}",
                            e.kind()
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}
