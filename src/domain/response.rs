//! Per-target invocation results.

use serde::Serialize;
use serde_json::Value;

use super::target::FunctionId;
use crate::error::InvocationError;

/// Degraded-result marker carried inside a response under the collect
/// strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationFault {
    /// Stable wire code (e.g. `"invocation-status"`, `"per-call-timeout"`).
    pub code: String,
    /// Human-readable failure description.
    pub message: String,
}

/// Result of one invocation, order-aligned to the input targets.
///
/// Exactly one response exists per target. A populated `error` field marks
/// a degraded result; `status_code`/`body`/`headers` still carry whatever
/// the remote returned, when anything was returned at all.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationResponse {
    pub id: FunctionId,
    pub status_code: Option<u16>,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub error: Option<InvocationFault>,
}

impl InvocationResponse {
    /// Build a successful response from a 2xx reply.
    #[must_use]
    pub fn success(
        id: FunctionId,
        status_code: u16,
        body: Option<Value>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            id,
            status_code: Some(status_code),
            body,
            headers,
            error: None,
        }
    }

    /// Build a degraded response from a terminal failure.
    ///
    /// Status-classified failures keep their status code and headers so the
    /// caller can still inspect what the remote said.
    #[must_use]
    pub fn degraded(id: FunctionId, error: &InvocationError) -> Self {
        let (status_code, headers) = match error {
            InvocationError::Status {
                status, headers, ..
            } => (Some(*status), headers.clone()),
            _ => (None, Vec::new()),
        };

        Self {
            id,
            status_code,
            body: None,
            headers,
            error: Some(InvocationFault {
                code: error.code().to_string(),
                message: error.to_string(),
            }),
        }
    }

    /// Check if the invocation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_status_response_keeps_status_and_headers() {
        let err = InvocationError::Status {
            target: FunctionId::new("fn-1"),
            status: 500,
            body: "boom".into(),
            headers: vec![("x-trace".into(), "t-1".into())],
        };
        let response = InvocationResponse::degraded(FunctionId::new("fn-1"), &err);

        assert!(!response.is_success());
        assert_eq!(response.status_code, Some(500));
        assert_eq!(response.headers.len(), 1);
        assert_eq!(
            response.error.as_ref().map(|f| f.code.as_str()),
            Some("invocation-status")
        );
    }

    #[test]
    fn degraded_timeout_response_has_no_status() {
        let err = InvocationError::PerCallTimeout {
            target: FunctionId::new("fn-1"),
            budget_ms: 3_000,
        };
        let response = InvocationResponse::degraded(FunctionId::new("fn-1"), &err);

        assert_eq!(response.status_code, None);
        assert_eq!(
            response.error.as_ref().map(|f| f.code.as_str()),
            Some("per-call-timeout")
        );
    }
}
