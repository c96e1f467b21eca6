//! Retry policy: retriability classification and linear backoff.

use std::time::Duration;

use crate::config::RetryConfig;
use crate::domain::RetryPredicate;
use crate::error::InvocationError;

/// HTTP statuses retried by default.
const RETRIABLE_STATUSES: [u16; 4] = [429, 500, 502, 504];

/// Decides whether a failed attempt is worth repeating and how long to
/// wait before doing so.
///
/// The attempt budget defaults to 3 and can be overridden per target.
/// Backoff is linear: attempt N sleeps `N * base_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    #[must_use]
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
        )
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Attempt budget for one target, honoring its override.
    #[must_use]
    pub fn attempts_for(&self, target_override: Option<u32>) -> u32 {
        target_override.unwrap_or(self.max_attempts).max(1)
    }

    /// Default retriability of a terminal attempt failure.
    #[must_use]
    pub fn is_retriable(&self, error: &InvocationError) -> bool {
        match error {
            InvocationError::PerCallTimeout { .. } => true,
            InvocationError::Status { status, .. } => RETRIABLE_STATUSES.contains(status),
            InvocationError::Network { kind, .. } => kind.is_retriable(),
            InvocationError::BatchTimeout { .. } | InvocationError::Unknown { .. } => false,
        }
    }

    /// Retriability decision with the caller predicate winning when present.
    #[must_use]
    pub fn decide(&self, predicate: Option<&RetryPredicate>, error: &InvocationError) -> bool {
        match predicate {
            Some(predicate) => predicate(error.status_code(), Some(error)),
            None => self.is_retriable(error),
        }
    }

    /// Delay inserted after the given (1-based) failed attempt.
    #[must_use]
    pub fn next_delay(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}
