//! Secret-store port and the app-key payload it must carry.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{CredentialError, Result};

/// A named secret as returned by the credential store.
#[derive(Debug, Clone)]
pub struct Secret {
    pub key: String,
    pub value: String,
}

/// OAuth2 client credentials, deserialized from the secret payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AppKey {
    pub client_id: String,
    pub client_secret: String,
}

impl AppKey {
    /// Parse an app key from a raw secret value.
    ///
    /// Fails with [`CredentialError::Format`] when the payload is not JSON
    /// or lacks a usable `client_id`/`client_secret` pair.
    pub fn parse(raw: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(raw).map_err(|err| CredentialError::Format {
            reason: err.to_string(),
        })?;

        if key.client_id.is_empty() || key.client_secret.is_empty() {
            return Err(CredentialError::Format {
                reason: "client_id and client_secret must be non-empty".into(),
            }
            .into());
        }

        Ok(key)
    }
}

/// Read access to the external credential store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by name. `use_cache = false` forces a fresh read.
    async fn read_secret(&self, name: &str, use_cache: bool) -> Result<Secret>;
}
