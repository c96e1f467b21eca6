//! Scripted [`HttpTransport`] mock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{NetworkErrorKind, TransportError};
use crate::port::{HttpCall, HttpReply, HttpTransport};

type ScriptedReply = (Option<Duration>, Result<HttpReply, TransportError>);

/// A mock transport with a scripted reply queue and call recording.
///
/// Each `send` pops the next scripted reply (defaults to an empty 200
/// when exhausted), optionally after a fixed delay so timeout behavior
/// can be driven under `tokio::test(start_paused = true)`.
///
/// Cloning shares the script and the recorders, so a clone handed to the
/// engine can still be observed from the test.
#[derive(Clone)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    calls: Arc<Mutex<Vec<HttpCall>>>,
    call_count: Arc<AtomicU32>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicU32::new(0)),
            delay: None,
        }
    }

    /// Queue a reply with the given status and body.
    #[must_use]
    pub fn with_reply(self, status: u16, body: String) -> Self {
        self.replies.lock().push_back((
            None,
            Ok(HttpReply {
                status,
                headers: Vec::new(),
                body,
            }),
        ));
        self
    }

    /// Queue a reply carrying response headers.
    #[must_use]
    pub fn with_reply_headers(
        self,
        status: u16,
        body: String,
        headers: Vec<(String, String)>,
    ) -> Self {
        self.replies.lock().push_back((
            None,
            Ok(HttpReply {
                status,
                headers,
                body,
            }),
        ));
        self
    }

    /// Queue a reply that only lands after `delay`, regardless of the
    /// transport-wide delay.
    #[must_use]
    pub fn with_delayed_reply(self, status: u16, body: String, delay: Duration) -> Self {
        self.replies.lock().push_back((
            Some(delay),
            Ok(HttpReply {
                status,
                headers: Vec::new(),
                body,
            }),
        ));
        self
    }

    /// Queue a network failure of the given kind.
    #[must_use]
    pub fn with_network_error(self, kind: NetworkErrorKind, message: &str) -> Self {
        self.replies.lock().push_back((
            None,
            Err(TransportError {
                kind,
                message: message.into(),
            }),
        ));
        self
    }

    /// Sleep this long before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Shared counter handle, for asserting after the mock moved into
    /// the engine.
    pub fn call_count_handle(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    /// Shared recording of every call seen, in order.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<HttpCall>>> {
        self.calls.clone()
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, call: HttpCall) -> Result<HttpReply, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(call);

        let (reply_delay, reply) = self.replies.lock().pop_front().unwrap_or((
            None,
            Ok(HttpReply {
                status: 200,
                headers: Vec::new(),
                body: String::new(),
            }),
        ));

        if let Some(delay) = reply_delay.or(self.delay) {
            tokio::time::sleep(delay).await;
        }

        reply
    }
}
