//! Single-invocation execution: auth, transport, classification, retries.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::domain::{
    ErrorStrategy, InvocationOptions, InvocationResponse, InvocationTarget,
};
use crate::error::{Error, InvocationError, Result};
use crate::port::{HttpCall, HttpReply, HttpTransport, ServiceDirectory};

use super::credentials::CredentialBroker;
use super::deadline::race_with_deadline;
use super::retry::RetryPolicy;

/// Outcome of one attempt, split by who handles it.
enum AttemptFailure {
    /// Credential production failed; aborts the batch under both
    /// strategies, never retried here.
    Credential(Error),
    /// The invocation itself failed; subject to retry accounting and
    /// strategy-dependent degradation.
    Invocation(InvocationError),
}

/// Runs one invocation end-to-end.
///
/// Per invocation the state machine is Pending, then Attempting, then
/// Succeeded, Retrying (back to Attempting), or FailedTerminal. A
/// terminal failure either aborts (returned as `Err`) or degrades into
/// the response's `error` field, per the batch error strategy.
pub struct InvocationExecutor {
    directory: Arc<dyn ServiceDirectory>,
    transport: Arc<dyn HttpTransport>,
    broker: Arc<CredentialBroker>,
    retry: RetryPolicy,
    account_id: String,
    gateway_service: String,
}

impl InvocationExecutor {
    pub fn new(
        directory: Arc<dyn ServiceDirectory>,
        transport: Arc<dyn HttpTransport>,
        broker: Arc<CredentialBroker>,
        retry: RetryPolicy,
        engine: &EngineConfig,
    ) -> Self {
        Self {
            directory,
            transport,
            broker,
            retry,
            account_id: engine.account_id.clone(),
            gateway_service: engine.gateway_service.clone(),
        }
    }

    /// Run one invocation to completion, each HTTP call bounded by
    /// `budget`.
    ///
    /// Errors only under the abort strategy; under collect every terminal
    /// invocation failure degrades into the response. Credential failures
    /// are the exception and abort under both strategies.
    pub async fn invoke(
        &self,
        target: &InvocationTarget,
        budget: Duration,
        options: &InvocationOptions,
    ) -> Result<InvocationResponse> {
        let max_attempts = self.retry.attempts_for(target.max_attempts);
        let mut attempt: u32 = 1;
        let mut refreshed = false;

        loop {
            let failure = match self.attempt(target, budget, options).await {
                Ok(response) => {
                    debug!(function = %target.id, attempt, "invocation succeeded");
                    return Ok(response);
                }
                Err(AttemptFailure::Credential(err)) => return Err(err),
                Err(AttemptFailure::Invocation(err)) => err,
            };

            // Token staleness is not request-specific: a 401 earns one
            // forced refresh and a replay of the same attempt before
            // normal retry accounting resumes.
            if failure.status_code() == Some(401) && !refreshed {
                warn!(function = %target.id, "401 from gateway, forcing token refresh");
                self.broker.force_refresh();
                refreshed = true;
                continue;
            }

            let retriable = self.retry.decide(target.retry_predicate.as_ref(), &failure);
            if retriable && attempt < max_attempts {
                let delay = self.retry.next_delay(attempt);
                debug!(
                    function = %target.id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    code = failure.code(),
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            warn!(
                function = %target.id,
                attempt,
                code = failure.code(),
                "invocation failed terminally"
            );
            return match options.error_strategy {
                ErrorStrategy::Abort => Err(failure.into()),
                ErrorStrategy::Collect => {
                    Ok(InvocationResponse::degraded(target.id.clone(), &failure))
                }
            };
        }
    }

    async fn attempt(
        &self,
        target: &InvocationTarget,
        budget: Duration,
        options: &InvocationOptions,
    ) -> std::result::Result<InvocationResponse, AttemptFailure> {
        let host = self
            .directory
            .resolve(&self.gateway_service)
            .await
            .map_err(|err| {
                AttemptFailure::Invocation(InvocationError::Unknown {
                    target: target.id.clone(),
                    message: err.to_string(),
                })
            })?;

        let authorization = self
            .broker
            .authorization_header()
            .await
            .map_err(AttemptFailure::Credential)?;

        let call = self.build_call(&host, target, &authorization);
        let reply = match race_with_deadline(self.transport.send(call), budget).await {
            Err(_) => {
                return Err(AttemptFailure::Invocation(InvocationError::PerCallTimeout {
                    target: target.id.clone(),
                    budget_ms: budget.as_millis() as u64,
                }))
            }
            Ok(Err(err)) => {
                return Err(AttemptFailure::Invocation(InvocationError::Network {
                    target: target.id.clone(),
                    kind: err.kind,
                    message: err.message,
                }))
            }
            Ok(Ok(reply)) => reply,
        };

        if !reply.is_success() {
            return Err(AttemptFailure::Invocation(InvocationError::Status {
                target: target.id.clone(),
                status: reply.status,
                body: reply.body,
                headers: reply.headers,
            }));
        }

        Ok(build_response(target, reply, options))
    }

    fn build_call(
        &self,
        host: &str,
        target: &InvocationTarget,
        authorization: &str,
    ) -> HttpCall {
        let url = format!(
            "https://{host}/api/account/{account}/lambdas/{id}/invoke?v=1&externalSystem={id}_{account}",
            account = self.account_id,
            id = target.id,
        );

        let headers: Vec<Value> = target
            .headers
            .iter()
            .map(|(key, value)| json!({ "key": key, "value": value }))
            .collect();
        let body = json!({
            "timestamp": Utc::now().timestamp_millis(),
            "payload": target.payload,
            "headers": headers,
        });

        HttpCall::post(url, body.to_string())
            .with_header("Authorization", authorization)
            .with_header("X-Request-Id", Uuid::new_v4().to_string())
            .with_header("Content-Type", "application/json")
    }
}

fn build_response(
    target: &InvocationTarget,
    reply: HttpReply,
    options: &InvocationOptions,
) -> InvocationResponse {
    let body = if reply.body.is_empty() {
        None
    } else if options.wants_json {
        // A non-JSON body from a 2xx degrades to a string value rather
        // than failing the call.
        Some(
            serde_json::from_str(&reply.body)
                .unwrap_or_else(|_| Value::String(reply.body.clone())),
        )
    } else {
        Some(Value::String(reply.body.clone()))
    };

    InvocationResponse::success(target.id.clone(), reply.status, body, reply.headers)
}
