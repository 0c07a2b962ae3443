//! # Sealdrop Storage
//!
//! Content-addressed storage layer for sealdrop encrypted attachments.
//!
//! This crate provides:
//! - **StorageBackend**: One capability (`is_configured`, `upload`) per provider
//! - **Pinata / web3.storage**: IPFS pinning providers reached over multipart HTTP
//! - **MemoryBackend**: In-process store for tests and local development
//! - **BackendChain**: Ordered, sequential fallback across providers
//! - **Fetcher**: Retrieval of stored ciphertext by URL
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Attachment Client            │
//! ├─────────────────────────────────────────┤
//! │      BackendChain       │    Fetcher    │
//! ├─────────────┬───────────┼───────────────┤
//! │   Pinata    │  web3.st  │  HttpFetcher  │
//! ├─────────────┴───────────┴───────────────┤
//! │           IPFS pinning / gateways       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealdrop_storage::{BackendChain, StorageConfig};
//!
//! let chain = BackendChain::from_config(&StorageConfig::from_env())?;
//! let receipt = chain.upload_with_fallback(ciphertext, "photo.png", "image/png").await?;
//! println!("stored at {}", receipt.url);
//! ```

pub mod chain;
pub mod cid_utils;
pub mod config;
pub mod error;
pub mod fetch;
pub mod memory;
pub mod pinata;
pub mod web3_storage;

pub use chain::{BackendChain, UploadReceipt};
pub use cid_utils::{create_cid, parse_cid};
pub use config::{PinataConfig, StorageConfig, Web3StorageConfig};
pub use error::{FailedAttempt, Result, StorageError};
pub use fetch::HttpFetcher;
pub use memory::MemoryBackend;
pub use pinata::PinataBackend;
pub use web3_storage::Web3StorageBackend;

use async_trait::async_trait;
use bytes::Bytes;

/// A storage provider that can publish bytes at a fetchable URL
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short provider name used in logs and errors
    fn name(&self) -> &str;

    /// Whether the credentials this provider needs are present
    fn is_configured(&self) -> bool;

    /// Credential variables this provider needs, e.g. `["WEB3_STORAGE_TOKEN"]`
    fn required_credentials(&self) -> Vec<String>;

    /// Upload `data` and return a publicly fetchable URL
    async fn upload(&self, data: Bytes, filename: &str) -> Result<String>;
}

/// Retrieval of raw stored bytes by URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the exact bytes published at `url`
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}
