//! Ordered fallback across storage backends
//!
//! Backends are tried one at a time in priority order. Unconfigured backends
//! are skipped without touching the network, a failing backend is logged and
//! the next one is tried, and no backend is retried. Uploads never run in
//! parallel, so one attachment is stored with at most one provider.

use crate::{
    config::StorageConfig, error::FailedAttempt, PinataBackend, Result, StorageBackend,
    StorageError, Web3StorageBackend,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Where an upload ended up
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Public URL of the stored object
    pub url: String,
    /// Name of the backend that accepted it
    pub backend: String,
}

/// An ordered list of storage backends
#[derive(Clone, Default)]
pub struct BackendChain {
    backends: Vec<Arc<dyn StorageBackend>>,
}

impl BackendChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard chain: Pinata first, then web3.storage
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        Ok(Self::new()
            .with_backend(PinataBackend::new(config.pinata.clone(), config.timeout)?)
            .with_backend(Web3StorageBackend::new(
                config.web3_storage.clone(),
                config.timeout,
            )?))
    }

    /// Append a backend at the lowest priority
    pub fn with_backend<B: StorageBackend + 'static>(self, backend: B) -> Self {
        self.with_shared_backend(Arc::new(backend))
    }

    /// Append a shared backend at the lowest priority
    pub fn with_shared_backend(mut self, backend: Arc<dyn StorageBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    /// Backend names in priority order
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Whether at least one backend has credentials
    pub fn has_configured_backend(&self) -> bool {
        self.backends.iter().any(|b| b.is_configured())
    }

    /// Every backend's credentials, one entry per backend (e.g. `"A_KEY/A_SECRET"`)
    pub fn required_credentials(&self) -> Vec<String> {
        self.backends
            .iter()
            .map(|b| b.required_credentials())
            .filter(|vars| !vars.is_empty())
            .map(|vars| vars.join("/"))
            .collect()
    }

    /// Upload `data` to the first backend that accepts it
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn upload_with_fallback(
        &self,
        data: Bytes,
        filename: &str,
        mime_type: &str,
    ) -> Result<UploadReceipt> {
        let mut attempts = Vec::new();

        for backend in &self.backends {
            if !backend.is_configured() {
                info!(backend = backend.name(), "backend not configured, skipping");
                continue;
            }

            match backend.upload(data.clone(), filename).await {
                Ok(url) => {
                    info!(backend = backend.name(), url = %url, "upload succeeded");
                    return Ok(UploadReceipt {
                        url,
                        backend: backend.name().to_string(),
                    });
                }
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "upload failed, trying next backend");
                    attempts.push(FailedAttempt {
                        backend: backend.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let required = self.required_credentials();
        if attempts.is_empty() {
            Err(StorageError::ConfigurationMissing { required })
        } else {
            Err(StorageError::NoStorageAvailable { attempts, required })
        }
    }
}
