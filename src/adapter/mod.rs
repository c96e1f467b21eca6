//! Port implementations against real infrastructure.
//!
//! - [`ReqwestTransport`] - HTTP transport over a shared reqwest client
//! - [`CsdsClient`] - service directory with an in-process cache
//! - [`OauthTokenClient`] - client-credentials exchange over the transport
//! - [`EnvSecretStore`] - secrets from environment variables

mod csds;
mod env;
mod oauth;
mod transport;

pub use csds::CsdsClient;
pub use env::EnvSecretStore;
pub use oauth::OauthTokenClient;
pub use transport::ReqwestTransport;
