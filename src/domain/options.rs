//! Batch-level invocation options.

use std::time::Duration;

/// Policy selecting how one terminal failure affects the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStrategy {
    /// The first terminal failure aborts the whole batch.
    #[default]
    Abort,
    /// Failures are recorded per response alongside successes.
    Collect,
}

impl ErrorStrategy {
    #[must_use]
    pub const fn is_abort(self) -> bool {
        matches!(self, Self::Abort)
    }

    #[must_use]
    pub const fn is_collect(self) -> bool {
        matches!(self, Self::Collect)
    }
}

/// Options applied to one `invoke()` call.
#[derive(Debug, Clone)]
pub struct InvocationOptions {
    /// Launch all targets concurrently instead of one at a time.
    pub parallel: bool,
    /// Abort-everything vs. collect-and-continue.
    pub error_strategy: ErrorStrategy,
    /// Explicit per-call budget. Discarded in favor of `deadline / N`
    /// when it would oversubscribe the batch deadline.
    pub per_call_timeout: Option<Duration>,
    /// Parse response bodies as JSON; otherwise carry them as strings.
    pub wants_json: bool,
    /// Cap on concurrently outstanding requests in parallel mode.
    /// `None` preserves the unlimited fan-out.
    pub max_concurrency: Option<usize>,
}

impl Default for InvocationOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            error_strategy: ErrorStrategy::Abort,
            per_call_timeout: None,
            wants_json: true,
            max_concurrency: None,
        }
    }
}

impl InvocationOptions {
    #[must_use]
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    #[must_use]
    pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
        self.error_strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_per_call_timeout(mut self, timeout: Duration) -> Self {
        self.per_call_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }
}
