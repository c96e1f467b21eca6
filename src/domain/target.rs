//! Invocation targets and per-target retry overrides.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvocationError;

/// Function identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionId(String);

impl FunctionId {
    /// Create a new `FunctionId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the function ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FunctionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for FunctionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Caller-supplied retriability override.
///
/// Receives the HTTP status (when the failure is status-classified) and
/// the terminal classification of the attempt. When present on a target
/// it replaces the default [`RetryPolicy`](crate::service::RetryPolicy)
/// decision entirely.
pub type RetryPredicate =
    Arc<dyn Fn(Option<u16>, Option<&InvocationError>) -> bool + Send + Sync>;

/// One remote function to invoke.
///
/// Caller-owned and consumed by a single `invoke()` call; `id` correlates
/// the request to its slot in the response vector.
#[derive(Clone)]
pub struct InvocationTarget {
    /// Function identifier, also used as the response correlation key.
    pub id: FunctionId,
    /// JSON payload forwarded to the function.
    pub payload: Value,
    /// Extra headers forwarded inside the request body.
    pub headers: Vec<(String, String)>,
    /// Per-target attempt budget; falls back to the engine default when `None`.
    pub max_attempts: Option<u32>,
    /// Per-target retriability override.
    pub retry_predicate: Option<RetryPredicate>,
}

impl InvocationTarget {
    pub fn new(id: impl Into<FunctionId>, payload: Value) -> Self {
        Self {
            id: id.into(),
            payload,
            headers: Vec::new(),
            max_attempts: None,
            retry_predicate: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn with_retry_predicate(mut self, predicate: RetryPredicate) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }
}

impl fmt::Debug for InvocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationTarget")
            .field("id", &self.id)
            .field("payload", &self.payload)
            .field("headers", &self.headers)
            .field("max_attempts", &self.max_attempts)
            .field("retry_predicate", &self.retry_predicate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_headers() {
        let target = InvocationTarget::new("fn-1", serde_json::json!({"k": 1}))
            .with_header("x-tenant", "acme")
            .with_header("x-locale", "en-US")
            .with_max_attempts(2);

        assert_eq!(target.id.as_str(), "fn-1");
        assert_eq!(target.headers.len(), 2);
        assert_eq!(target.max_attempts, Some(2));
        assert!(target.retry_predicate.is_none());
    }

    #[test]
    fn debug_reports_predicate_presence_not_contents() {
        let target = InvocationTarget::new("fn-1", Value::Null)
            .with_retry_predicate(Arc::new(|_, _| false));
        let rendered = format!("{target:?}");
        assert!(rendered.contains("retry_predicate: true"));
    }
}
