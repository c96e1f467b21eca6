//! Environment-backed secret store.
//!
//! Maps a secret name to an uppercased environment variable
//! (`oauth_app_key` → `OAUTH_APP_KEY`) and loads a local `.env` file once
//! on construction. Suited to development and container deployments where
//! the platform injects secrets through the environment.

use async_trait::async_trait;

use crate::error::{CredentialError, Result};
use crate::port::{Secret, SecretStore};

pub struct EnvSecretStore;

impl EnvSecretStore {
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn read_secret(&self, name: &str, _use_cache: bool) -> Result<Secret> {
        let var = name.to_uppercase().replace('-', "_");
        match std::env::var(&var) {
            Ok(value) => Ok(Secret {
                key: name.to_string(),
                value,
            }),
            Err(_) => Err(CredentialError::Fetch {
                name: name.to_string(),
                message: format!("environment variable {var} is not set"),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::*;

    #[tokio::test]
    async fn reads_the_uppercased_variable() {
        std::env::set_var("VOLLEY_TEST_APP_KEY", r#"{"client_id": "x"}"#);
        let store = EnvSecretStore;

        let secret = store.read_secret("volley_test_app_key", true).await.unwrap();
        assert_eq!(secret.key, "volley_test_app_key");
        assert_eq!(secret.value, r#"{"client_id": "x"}"#);
    }

    #[tokio::test]
    async fn a_missing_variable_is_a_fetch_error() {
        let store = EnvSecretStore;
        let err = store.read_secret("volley_test_missing", true).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Credential(CredentialError::Fetch { .. })
        ));
    }
}
