//! Caller-side retry of transient store failures.
//!
//! The core never retries internally. Outer layers (HTTP handlers, the
//! CLI) wrap core calls in [`with_backoff`] so that a brief store outage
//! does not surface immediately. Definitive outcomes are returned on the
//! first attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use qrlink_core::config::LinkConfig;
use qrlink_core::result::AppResult;

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            attempts: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Build the policy from link configuration.
    pub fn from_config(config: &LinkConfig) -> Self {
        Self {
            attempts: config.retry_attempts,
            base_delay: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << retry.min(16))
    }
}

/// Run `op`, retrying while it fails with a transient error.
pub async fn with_backoff<T, F, Fut>(policy: RetryPolicy, operation: &str, mut op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut retry = 0;
    loop {
        match op().await {
            Err(e) if e.is_transient() && retry < policy.attempts => {
                let delay = policy.delay_for(retry);
                warn!(
                    operation,
                    attempt = retry + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient store failure, retrying"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            other => return other,
        }
    }
}
