//! In-memory [`SecretStore`] mock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{CredentialError, Result};
use crate::port::{Secret, SecretStore};

/// A secret store backed by a fixed name-to-value map.
#[derive(Clone, Default)]
pub struct InMemorySecretStore {
    secrets: HashMap<String, String>,
    read_count: Arc<AtomicU32>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw secret value under `name`.
    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }

    /// Store a well-formed app-key payload under `name`.
    pub fn with_app_key(
        name: impl Into<String>,
        client_id: &str,
        client_secret: &str,
    ) -> Self {
        Self::new().with_secret(
            name,
            json!({ "client_id": client_id, "client_secret": client_secret }).to_string(),
        )
    }

    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn read_secret(&self, name: &str, _use_cache: bool) -> Result<Secret> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        match self.secrets.get(name) {
            Some(value) => Ok(Secret {
                key: name.to_string(),
                value: value.clone(),
            }),
            None => Err(CredentialError::Fetch {
                name: name.to_string(),
                message: "secret not found".into(),
            }
            .into()),
        }
    }
}
