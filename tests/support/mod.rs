//! Shared wiring for engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use volley::config::{AuthConfig, EngineConfig};
use volley::service::{
    CredentialBroker, FanOutOrchestrator, InvocationExecutor, RetryPolicy,
};
use volley::testkit::{
    InMemorySecretStore, ScriptedTokenExchange, ScriptedTransport, StaticDirectory,
};

pub const ACCOUNT: &str = "acct-1";
pub const GATEWAY: &str = "functionGateway";
pub const GATEWAY_HOST: &str = "faas.example.com";

/// A fully wired engine over scripted collaborators.
///
/// The mock handles are clones sharing state with the engine's copies,
/// so scripts and counters stay observable after construction.
pub struct Harness {
    pub engine: FanOutOrchestrator,
    pub transport: ScriptedTransport,
    pub exchange: ScriptedTokenExchange,
    pub broker: Arc<CredentialBroker>,
}

pub fn harness(transport: &ScriptedTransport) -> Harness {
    harness_full(
        transport,
        &ScriptedTokenExchange::new(),
        InMemorySecretStore::with_app_key("oauth_app_key", "id-1", "s3cret"),
    )
}

pub fn harness_with_secrets(
    transport: &ScriptedTransport,
    secrets: InMemorySecretStore,
) -> Harness {
    harness_full(transport, &ScriptedTokenExchange::new(), secrets)
}

pub fn harness_full(
    transport: &ScriptedTransport,
    exchange: &ScriptedTokenExchange,
    secrets: InMemorySecretStore,
) -> Harness {
    let directory = Arc::new(
        StaticDirectory::with_entry(GATEWAY, GATEWAY_HOST)
            .and_entry("authServer", "auth.example.com"),
    );
    let broker = Arc::new(CredentialBroker::new(
        Arc::new(secrets),
        directory.clone(),
        Arc::new(exchange.clone()),
        AuthConfig::default(),
    ));
    let engine_config = EngineConfig {
        account_id: ACCOUNT.into(),
        gateway_service: GATEWAY.into(),
    };
    let executor = Arc::new(InvocationExecutor::new(
        directory,
        Arc::new(transport.clone()),
        broker.clone(),
        RetryPolicy::new(3, Duration::from_millis(100)),
        &engine_config,
    ));

    Harness {
        engine: FanOutOrchestrator::new(executor),
        transport: transport.clone(),
        exchange: exchange.clone(),
        broker,
    }
}
