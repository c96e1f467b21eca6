//! Multi-target coordination under one shared deadline budget.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{InvocationOptions, InvocationResponse, InvocationTarget};
use crate::error::{InvocationError, Result};

use super::deadline::race_with_deadline;
use super::executor::InvocationExecutor;

/// Hard ceiling on any batch deadline.
pub const MAX_DEADLINE: Duration = Duration::from_millis(25_000);

/// Coordinates N invocations under one deadline and one error strategy.
///
/// The deadline is clamped to [`MAX_DEADLINE`] and subdivided across the
/// targets; the whole batch additionally races against the deadline, so a
/// stalled batch fails with a batch timeout regardless of per-call
/// progress.
pub struct FanOutOrchestrator {
    executor: Arc<InvocationExecutor>,
}

impl FanOutOrchestrator {
    pub fn new(executor: Arc<InvocationExecutor>) -> Self {
        Self { executor }
    }

    /// Invoke every target under one shared deadline.
    ///
    /// `deadline = None` uses the ceiling. The response vector is always
    /// index-aligned to `targets`; under the abort strategy the call
    /// either returns all N responses or fails, never a partial vector.
    pub async fn invoke(
        &self,
        targets: Vec<InvocationTarget>,
        deadline: Option<Duration>,
        options: InvocationOptions,
    ) -> Result<Vec<InvocationResponse>> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let deadline = deadline.unwrap_or(MAX_DEADLINE).min(MAX_DEADLINE);
        let budget = per_call_budget(&options, deadline, targets.len());

        debug!(
            targets = targets.len(),
            deadline_ms = deadline.as_millis() as u64,
            budget_ms = budget.as_millis() as u64,
            parallel = options.parallel,
            strategy = ?options.error_strategy,
            "dispatching batch"
        );

        let run = async {
            if options.parallel {
                self.run_parallel(&targets, budget, &options).await
            } else {
                self.run_sequential(&targets, budget, &options).await
            }
        };

        match race_with_deadline(run, deadline).await {
            Ok(result) => result,
            Err(elapsed) => {
                warn!(
                    deadline_ms = elapsed.limit.as_millis() as u64,
                    "batch deadline elapsed"
                );
                Err(InvocationError::BatchTimeout {
                    budget_ms: elapsed.limit.as_millis() as u64,
                }
                .into())
            }
        }
    }

    /// One target at a time, in input order. Under abort the first
    /// failure stops the walk; later targets are never attempted.
    async fn run_sequential(
        &self,
        targets: &[InvocationTarget],
        budget: Duration,
        options: &InvocationOptions,
    ) -> Result<Vec<InvocationResponse>> {
        let mut responses = Vec::with_capacity(targets.len());
        for target in targets {
            responses.push(self.executor.invoke(target, budget, options).await?);
        }
        Ok(responses)
    }

    /// All targets at once, optionally capped by a semaphore. Under abort
    /// the first failure becomes the overall failure and the in-flight
    /// siblings are dropped with it.
    async fn run_parallel(
        &self,
        targets: &[InvocationTarget],
        budget: Duration,
        options: &InvocationOptions,
    ) -> Result<Vec<InvocationResponse>> {
        let semaphore = options
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let calls = targets.iter().map(|target| {
            let semaphore = semaphore.clone();
            async move {
                let _permit = match semaphore {
                    // The semaphore lives for the whole batch, so acquire
                    // only fails if it is closed, which never happens here.
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                self.executor.invoke(target, budget, options).await
            }
        });

        try_join_all(calls).await
    }
}

/// Each target's share of the batch deadline.
///
/// An explicit per-call timeout that oversubscribes the deadline is
/// discarded in favor of the fair share; a misconfigured value must not
/// starve sibling calls of budget, so this is a downgrade, not an error.
fn per_call_budget(options: &InvocationOptions, deadline: Duration, count: usize) -> Duration {
    let fair = deadline / count as u32;
    match options.per_call_timeout {
        Some(requested) => {
            let oversubscribed = requested
                .checked_mul(count as u32)
                .map_or(true, |total| total > deadline);
            if oversubscribed {
                warn!(
                    requested_ms = requested.as_millis() as u64,
                    fair_ms = fair.as_millis() as u64,
                    targets = count,
                    "per-call timeout oversubscribes the deadline, using fair share"
                );
                fair
            } else {
                requested
            }
        }
        None => fair,
    }
}
