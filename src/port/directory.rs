//! Service-discovery port (CSDS).

use async_trait::async_trait;

use crate::error::Result;

/// Resolves a logical service name to a network host.
///
/// Implementations are expected to cache resolved hosts; the engine calls
/// [`resolve`](ServiceDirectory::resolve) on every attempt.
#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    /// Resolve `service` to a bare host name (no scheme).
    ///
    /// Fails with [`DirectoryError::NotFound`](crate::error::DirectoryError::NotFound)
    /// for an unknown name.
    async fn resolve(&self, service: &str) -> Result<String>;
}
