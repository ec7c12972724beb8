//! Retry policy applied uniformly to every step.

use std::time::Duration;

use crate::config::{RetryConfig, RetryScope};
use crate::steps::StepFailure;

/// How many times, how long to wait, and for which failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub retries: u32,
    pub delay: Duration,
    pub scope: RetryScope,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            retries: config.retries,
            delay: Duration::from_secs(config.delay_secs),
            scope: config.retry_on,
        }
    }
}

impl RetryPolicy {
    /// Never retry.
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
            scope: RetryScope::All,
        }
    }

    /// Total attempts a step may make.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Whether a step that just failed its `attempt`-th try (1-based) runs again.
    pub fn should_retry(&self, failure: &StepFailure, attempt: u32) -> bool {
        if attempt >= self.max_attempts() {
            return false;
        }
        match self.scope {
            RetryScope::All => true,
            RetryScope::Infrastructure => failure.transient,
        }
    }
}
