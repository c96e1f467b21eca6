//! Generic HTTP transport port.

use async_trait::async_trait;

use crate::error::TransportError;

/// Methods the engine actually issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One outbound HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpCall {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpCall {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Post,
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// What came back from the wire.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a single HTTP exchange.
///
/// Failures carry a [`NetworkErrorKind`](crate::error::NetworkErrorKind)
/// assigned at the transport boundary. Cancellation is dropping the
/// returned future; the engine bounds each call with its budget share.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, call: HttpCall) -> Result<HttpReply, TransportError>;
}
