//! Bearer-token production and caching.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::AuthConfig;
use crate::domain::AccessToken;
use crate::error::Result;
use crate::port::{AppKey, SecretStore, ServiceDirectory, TokenExchange};

/// Produces `Authorization` header values from a cached OAuth2 token.
///
/// One broker instance is owned by the engine and shared by every
/// concurrent invocation. The cache is a single token behind a mutex;
/// the lock is never held across an await, so concurrent refreshes are
/// tolerated and the last writer wins. A stale overwrite costs one extra
/// token exchange, never correctness.
///
/// The broker never retries internally: credential and auth-server
/// failures propagate unmodified to the caller.
pub struct CredentialBroker {
    secrets: Arc<dyn SecretStore>,
    directory: Arc<dyn ServiceDirectory>,
    oauth: Arc<dyn TokenExchange>,
    config: AuthConfig,
    cache: Mutex<Option<AccessToken>>,
}

impl CredentialBroker {
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        directory: Arc<dyn ServiceDirectory>,
        oauth: Arc<dyn TokenExchange>,
        config: AuthConfig,
    ) -> Self {
        Self {
            secrets,
            directory,
            oauth,
            config,
            cache: Mutex::new(None),
        }
    }

    /// Current `Authorization` header value, minting a token when the
    /// cache is empty or expired.
    pub async fn authorization_header(&self) -> Result<String> {
        if let Some(token) = self.cached_fresh() {
            return Ok(token.authorization_header());
        }

        let token = self.mint().await?;
        let header = token.authorization_header();
        *self.cache.lock() = Some(token);
        Ok(header)
    }

    /// Drop the cached token so the next call mints a fresh one.
    pub fn force_refresh(&self) {
        debug!("access token cache invalidated");
        *self.cache.lock() = None;
    }

    /// Pre-populate the cache. Test and bootstrap hook.
    #[cfg(any(test, feature = "testkit"))]
    pub fn seed_token(&self, token: AccessToken) {
        *self.cache.lock() = Some(token);
    }

    fn cached_fresh(&self) -> Option<AccessToken> {
        self.cache
            .lock()
            .as_ref()
            .filter(|token| !token.is_expired())
            .cloned()
    }

    async fn mint(&self) -> Result<AccessToken> {
        let secret = self
            .secrets
            .read_secret(&self.config.secret_name, true)
            .await?;
        let key = AppKey::parse(&secret.value)?;
        let host = self.directory.resolve(&self.config.auth_service).await?;
        let grant = self.oauth.exchange(&host, &key).await?;

        debug!(
            token_type = %grant.token_type,
            expires_in = grant.expires_in,
            "access token minted"
        );

        Ok(AccessToken::new(
            grant.access_token,
            grant.token_type,
            grant.expires_in,
        ))
    }
}
