use std::time::Duration;

use querylink_domain::HttpConfig;

/// Attempt bound and pause between attempts.
///
/// A zero base backoff retries immediately. Otherwise the pause doubles with
/// each retry, capped at 256 times the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_backoff }
    }

    pub fn from_config(config: &HttpConfig) -> Self {
        Self::new(config.max_attempts, config.retry_backoff())
    }

    /// Physical attempts per logical call (initial try + retries).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause before retry number `retry_number` (1-based).
    pub fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    pub(crate) async fn pause(&self, retry_number: u32) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
