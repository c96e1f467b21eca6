//! OAuth2 token-exchange port (client-credentials grant).

use async_trait::async_trait;
use serde::Deserialize;

use super::secrets::AppKey;
use crate::error::Result;

/// Raw grant returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Exchanges static client credentials for a short-lived bearer token.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Perform a client-credentials exchange against the auth server at
    /// `host`.
    ///
    /// Anything other than a 2xx response carrying all grant fields fails
    /// with [`CredentialError::AuthServerResponse`](crate::error::CredentialError::AuthServerResponse).
    async fn exchange(&self, host: &str, credentials: &AppKey) -> Result<TokenGrant>;
}
