//! Volley - resilient multi-target serverless function invocation.
//!
//! This crate calls one or more remote serverless functions over HTTP
//! under a single caller-supplied time budget, with OAuth2 bearer-token
//! management, pluggable retries, and precise partial-failure semantics.
//!
//! # Architecture
//!
//! The engine is a stack of small services behind hexagonal ports:
//!
//! - **`service::fanout`** - [`FanOutOrchestrator`]: one deadline, N targets,
//!   sequential or parallel, abort-everything or collect-and-continue
//! - **`service::executor`** - [`InvocationExecutor`]: one invocation
//!   end-to-end with retry accounting and 401 replay
//! - **`service::credentials`** - [`CredentialBroker`]: cached bearer token
//!   with lazy and forced refresh
//! - **`service::retry`** / **`service::deadline`** - retriability,
//!   linear backoff, and deadline racing
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Targets, options, responses, tokens
//! - [`error`] - Classified error taxonomy
//! - [`port`] - Traits for the external collaborators (CSDS, secrets,
//!   OAuth2, HTTP transport)
//! - [`adapter`] - reqwest-backed implementations of the ports
//! - [`service`] - The invocation engine itself
//!
//! # Features
//!
//! - `testkit` - Expose scripted mock ports for integration tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use volley::adapter::{CsdsClient, EnvSecretStore, OauthTokenClient, ReqwestTransport};
//! use volley::service::{
//!     CredentialBroker, FanOutOrchestrator, InvocationExecutor, RetryPolicy,
//! };
//! use volley::{Config, InvocationOptions, InvocationTarget};
//!
//! # async fn run() -> volley::Result<()> {
//! let config = Config::load("config.toml")?;
//! let transport = Arc::new(ReqwestTransport::from_config(&config.http));
//! let directory = Arc::new(CsdsClient::new(
//!     transport.clone(),
//!     &config.directory,
//!     config.engine.account_id.clone(),
//! ));
//! let broker = Arc::new(CredentialBroker::new(
//!     Arc::new(EnvSecretStore::from_env()),
//!     directory.clone(),
//!     Arc::new(OauthTokenClient::new(transport.clone())),
//!     config.auth.clone(),
//! ));
//! let executor = Arc::new(InvocationExecutor::new(
//!     directory,
//!     transport,
//!     broker,
//!     RetryPolicy::from_config(&config.retry),
//!     &config.engine,
//! ));
//! let engine = FanOutOrchestrator::new(executor);
//!
//! let responses = engine
//!     .invoke(
//!         vec![InvocationTarget::new("fn-1", serde_json::json!({ "hello": "world" }))],
//!         Some(Duration::from_secs(5)),
//!         InvocationOptions::default(),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod service;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use config::Config;
pub use domain::{
    ErrorStrategy, FunctionId, InvocationFault, InvocationOptions, InvocationResponse,
    InvocationTarget,
};
pub use error::{Error, Result};
pub use service::{FanOutOrchestrator, MAX_DEADLINE};
