//! Trait definitions (hexagonal ports). Depend only on domain and error.
//!
//! Ports are the boundaries to the four external collaborators the engine
//! consumes. Adapters implement them against real infrastructure; the
//! testkit implements them as scripted mocks.
//!
//! # Available Ports
//!
//! - [`ServiceDirectory`] - logical service name to host resolution (CSDS)
//! - [`SecretStore`] - credential store holding the OAuth2 app key
//! - [`TokenExchange`] - OAuth2 client-credentials token endpoint
//! - [`HttpTransport`] - the underlying HTTP wire

mod directory;
mod oauth;
mod secrets;
mod transport;

pub use directory::ServiceDirectory;
pub use oauth::{TokenExchange, TokenGrant};
pub use secrets::{AppKey, Secret, SecretStore};
pub use transport::{HttpCall, HttpMethod, HttpReply, HttpTransport};
