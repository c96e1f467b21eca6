//! Scripted [`TokenExchange`] mock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::port::{AppKey, TokenExchange, TokenGrant};

/// A token endpoint with scripted grants.
///
/// Each `exchange` pops the next scripted result; when the script is
/// exhausted a fresh hour-long grant is handed out. Cloning shares the
/// script and the counter.
#[derive(Clone)]
pub struct ScriptedTokenExchange {
    grants: Arc<Mutex<VecDeque<Result<TokenGrant>>>>,
    exchange_count: Arc<AtomicU32>,
}

impl ScriptedTokenExchange {
    pub fn new() -> Self {
        Self {
            grants: Arc::new(Mutex::new(VecDeque::new())),
            exchange_count: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Queue a successful grant.
    #[must_use]
    pub fn with_grant(self, access_token: &str, expires_in: u64) -> Self {
        self.grants.lock().push_back(Ok(TokenGrant {
            access_token: access_token.into(),
            token_type: "Bearer".into(),
            expires_in,
        }));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn with_error(self, error: Error) -> Self {
        self.grants.lock().push_back(Err(error));
        self
    }

    pub fn exchange_count(&self) -> u32 {
        self.exchange_count.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedTokenExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenExchange for ScriptedTokenExchange {
    async fn exchange(&self, _host: &str, _credentials: &AppKey) -> Result<TokenGrant> {
        self.exchange_count.fetch_add(1, Ordering::SeqCst);
        self.grants.lock().pop_front().unwrap_or_else(|| {
            Ok(TokenGrant {
                access_token: "scripted-token".into(),
                token_type: "Bearer".into(),
                expires_in: 3_600,
            })
        })
    }
}
