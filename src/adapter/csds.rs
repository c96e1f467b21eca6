//! HTTP service-directory (CSDS) client with an in-process cache.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};
use crate::port::{HttpCall, HttpTransport, ServiceDirectory};

#[derive(Debug, Deserialize)]
struct BaseUriRecord {
    service: String,
    #[serde(rename = "baseURI")]
    base_uri: String,
}

#[derive(Debug, Deserialize)]
struct BaseUriResponse {
    #[serde(rename = "baseURIs")]
    base_uris: Vec<BaseUriRecord>,
}

/// [`ServiceDirectory`] against the CSDS resolution endpoint.
///
/// One lookup fetches the whole service map for the account; every entry
/// is cached so subsequent resolutions are lock-read-only.
pub struct CsdsClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    account_id: String,
    cache: RwLock<HashMap<String, String>>,
}

impl CsdsClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        config: &DirectoryConfig,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            account_id: account_id.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    async fn fetch_service_map(&self) -> Result<HashMap<String, String>> {
        let url = format!(
            "{}/api/account/{}/service/baseURI.json?version=1.0",
            self.base_url, self.account_id
        );
        let reply = self.transport.send(HttpCall::get(url)).await?;

        if !reply.is_success() {
            return Err(DirectoryError::Lookup {
                message: format!("CSDS returned status {}", reply.status),
            }
            .into());
        }

        let parsed: BaseUriResponse =
            serde_json::from_str(&reply.body).map_err(|err| DirectoryError::Lookup {
                message: format!("malformed CSDS response: {err}"),
            })?;

        Ok(parsed
            .base_uris
            .into_iter()
            .map(|record| (record.service, record.base_uri))
            .collect())
    }
}

#[async_trait]
impl ServiceDirectory for CsdsClient {
    async fn resolve(&self, service: &str) -> Result<String> {
        if let Some(host) = self.cache.read().get(service) {
            return Ok(host.clone());
        }

        let map = self.fetch_service_map().await?;
        debug!(services = map.len(), "service map refreshed");

        let host = map.get(service).cloned().ok_or_else(|| {
            DirectoryError::NotFound {
                service: service.to_string(),
            }
        })?;

        *self.cache.write() = map;
        Ok(host)
    }
}

#[cfg(test)]
mod tests {
    use crate::testkit::ScriptedTransport;

    use super::*;

    fn service_map_body() -> String {
        r#"{"baseURIs": [
            {"service": "functionGateway", "baseURI": "faas.example.com"},
            {"service": "authServer", "baseURI": "auth.example.com"}
        ]}"#
        .into()
    }

    fn client(transport: ScriptedTransport) -> CsdsClient {
        CsdsClient::new(
            Arc::new(transport),
            &DirectoryConfig {
                base_url: "https://csds.example.com".into(),
            },
            "acct-1",
        )
    }

    #[tokio::test]
    async fn resolves_and_caches_the_service_map() {
        let transport = ScriptedTransport::new().with_reply(200, service_map_body());
        let counter = transport.call_count_handle();
        let client = client(transport);

        assert_eq!(
            client.resolve("functionGateway").await.unwrap(),
            "faas.example.com"
        );
        // Second lookup of a different service hits the cache.
        assert_eq!(client.resolve("authServer").await.unwrap(), "auth.example.com");
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_service_is_not_found() {
        let transport = ScriptedTransport::new().with_reply(200, service_map_body());
        let client = client(transport);

        let err = client.resolve("nonexistent").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Directory(DirectoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn non_2xx_is_a_lookup_failure() {
        let transport = ScriptedTransport::new().with_reply(503, String::new());
        let client = client(transport);

        let err = client.resolve("functionGateway").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Directory(DirectoryError::Lookup { .. })
        ));
    }
}
