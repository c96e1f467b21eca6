//! Static [`ServiceDirectory`] mock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{DirectoryError, Result};
use crate::port::ServiceDirectory;

/// A directory backed by a fixed service-to-host map.
#[derive(Clone, Default)]
pub struct StaticDirectory {
    entries: HashMap<String, String>,
    resolve_count: Arc<AtomicU32>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single-entry directory.
    pub fn with_entry(service: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new().and_entry(service, host)
    }

    #[must_use]
    pub fn and_entry(mut self, service: impl Into<String>, host: impl Into<String>) -> Self {
        self.entries.insert(service.into(), host.into());
        self
    }

    pub fn resolve_count(&self) -> u32 {
        self.resolve_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceDirectory for StaticDirectory {
    async fn resolve(&self, service: &str) -> Result<String> {
        self.resolve_count.fetch_add(1, Ordering::SeqCst);
        self.entries.get(service).cloned().ok_or_else(|| {
            DirectoryError::NotFound {
                service: service.to_string(),
            }
            .into()
        })
    }
}
