//! OAuth2 client-credentials exchange against the resolved auth host.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use url::form_urlencoded;

use crate::error::{CredentialError, Result};
use crate::port::{AppKey, HttpCall, HttpTransport, TokenExchange, TokenGrant};

/// [`TokenExchange`] posting a client-credentials form to the auth server.
pub struct OauthTokenClient {
    transport: Arc<dyn HttpTransport>,
}

impl OauthTokenClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl TokenExchange for OauthTokenClient {
    async fn exchange(&self, host: &str, credentials: &AppKey) -> Result<TokenGrant> {
        let url = format!("https://{host}/oauth2/token");
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", &credentials.client_id)
            .append_pair("client_secret", &credentials.client_secret)
            .finish();

        let call = HttpCall::post(url, body)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_header("Accept", "application/json");
        let reply = self.transport.send(call).await?;

        if !reply.is_success() {
            return Err(CredentialError::AuthServerResponse {
                status: reply.status,
                body: reply.body,
            }
            .into());
        }

        let grant: TokenGrant =
            serde_json::from_str(&reply.body).map_err(|_| CredentialError::AuthServerResponse {
                status: reply.status,
                body: reply.body.clone(),
            })?;

        if grant.access_token.is_empty() {
            return Err(CredentialError::AuthServerResponse {
                status: reply.status,
                body: reply.body,
            }
            .into());
        }

        debug!(expires_in = grant.expires_in, "token exchange completed");
        Ok(grant)
    }
}
