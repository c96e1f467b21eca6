//! reqwest-backed HTTP transport.
//!
//! Network failures are classified into [`NetworkErrorKind`] here, at the
//! boundary, by inspecting the reqwest error and its io source chain.
//! Downstream code only ever matches on the assigned kind.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::warn;

use crate::config::HttpConfig;
use crate::error::{NetworkErrorKind, TransportError};
use crate::port::{HttpCall, HttpMethod, HttpReply, HttpTransport};

/// [`HttpTransport`] over a shared `reqwest` client.
pub struct ReqwestTransport {
    http: HttpClient,
}

impl ReqwestTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: HttpClient::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &HttpConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self { http }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, call: HttpCall) -> Result<HttpReply, TransportError> {
        let mut request = match call.method {
            HttpMethod::Get => self.http.get(&call.url),
            HttpMethod::Post => self.http.post(&call.url),
        };
        for (key, value) in &call.headers {
            request = request.header(key, value);
        }
        if let Some(body) = call.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|err| TransportError {
            kind: classify(&err),
            message: err.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(key, value)| {
                (
                    key.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.map_err(|err| TransportError {
            kind: classify(&err),
            message: err.to_string(),
        })?;

        Ok(HttpReply {
            status,
            headers,
            body,
        })
    }
}

/// Assign the network kind from the reqwest error and its source chain.
fn classify(err: &reqwest::Error) -> NetworkErrorKind {
    if err.is_timeout() {
        return NetworkErrorKind::TimedOut;
    }

    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(io_err) = inner.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionReset => return NetworkErrorKind::ConnectionReset,
                io::ErrorKind::ConnectionRefused => {
                    return NetworkErrorKind::ConnectionRefused
                }
                io::ErrorKind::BrokenPipe => return NetworkErrorKind::BrokenPipe,
                io::ErrorKind::TimedOut => return NetworkErrorKind::SocketTimedOut,
                _ => {}
            }
        }
        if inner.to_string().contains("dns error") {
            return NetworkErrorKind::DnsRetry;
        }
        source = inner.source();
    }

    if err.is_connect() {
        return NetworkErrorKind::ConnectionRefused;
    }

    NetworkErrorKind::Other
}
