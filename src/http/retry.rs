//! Retry policies for proxy GETs.
//!
//! Only idempotent calls (`status`, `refresh`) retry. A resubmitted write
//! could be applied twice, so `submit` always runs with [`RetryPolicy::None`].

use std::time::Duration;

use crate::error::TransportError;

#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    #[default]
    None,
    /// Connection failures and 502/503/504, exponential backoff.
    Idempotent,
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// The concrete config, or `None` when the call must not retry.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(config) => Some(config.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// ±25% randomization of each delay.
    pub jitter: bool,
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![502, 503, 504],
        }
    }

    /// Whether `error` is worth another attempt under this config.
    pub fn is_retryable(&self, error: &TransportError) -> bool {
        match error {
            TransportError::Proxy { status, .. } => self.retryable_statuses.contains(status),
            TransportError::Reqwest(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);
        let millis = if self.jitter {
            let spread = capped * 0.25;
            (capped + (rand::random::<f64>() - 0.5) * 2.0 * spread).max(0.0)
        } else {
            capped
        };
        Duration::from_millis(millis as u64)
    }
}
