//! In-memory storage backend for testing and local development
//!
//! Objects are addressed like a gateway would address them, by the CID of
//! the stored bytes: `<gateway>/<cid>`.

use crate::{cid_utils::create_cid, Fetcher, Result, StorageBackend, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

/// Backend name used in logs and errors
pub const MEMORY: &str = "memory";

/// Default base URL for in-memory objects
pub const DEFAULT_MEMORY_GATEWAY: &str = "https://memory.sealdrop.invalid/ipfs";

/// An in-memory object store that is both a backend and a fetcher
#[derive(Clone)]
pub struct MemoryBackend {
    objects: Arc<DashMap<String, Bytes>>,
    gateway: String,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::with_gateway(DEFAULT_MEMORY_GATEWAY)
    }

    /// Create with a custom base URL
    pub fn with_gateway(gateway: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
            gateway: gateway.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the number of objects stored
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Clear all objects
    pub fn clear(&self) {
        self.objects.clear();
    }

    /// Get the bytes stored at `url`
    pub fn get(&self, url: &str) -> Option<Bytes> {
        self.objects.get(url).map(|entry| entry.value().clone())
    }

    /// Replace the bytes served at `url`, e.g. to simulate a misbehaving gateway
    pub fn overwrite(&self, url: &str, data: impl Into<Bytes>) {
        self.objects.insert(url.to_string(), data.into());
    }

    /// List all stored URLs
    pub fn urls(&self) -> Vec<String> {
        self.objects.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        MEMORY
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn required_credentials(&self) -> Vec<String> {
        Vec::new()
    }

    async fn upload(&self, data: Bytes, _filename: &str) -> Result<String> {
        let url = format!("{}/{}", self.gateway, create_cid(&data));
        self.objects.insert(url.clone(), data);
        Ok(url)
    }
}

#[async_trait]
impl Fetcher for MemoryBackend {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        self.get(url).ok_or_else(|| StorageError::DownloadFailed {
            url: url.to_string(),
            reason: "not found".to_string(),
        })
    }
}
