//! # Sealdrop Client SDK
//!
//! Encrypts a file, parks the ciphertext on public content-addressed storage
//! and hands back a small descriptor that lets a recipient fetch, verify and
//! decrypt it.
//!
//! ## Features
//!
//! - **Client-Side Encryption**: HKDF-SHA256 derived AES-256-GCM keys, fresh per file
//! - **Storage Fallback**: Pinata first, web3.storage second
//! - **Integrity Checks**: SHA-256 and length verified before decryption
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealdrop_client::{AttachmentClient, Config, VerificationPolicy};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = AttachmentClient::new(Config::from_env())?;
//!
//!     let descriptor = client.upload(b"Hello, World!", "hello.txt", "text/plain").await?;
//!     println!("{}", descriptor.to_json()?);
//!
//!     let attachment = client.load(&descriptor, VerificationPolicy::Verify).await?;
//!     assert_eq!(attachment.data, b"Hello, World!");
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod descriptor;
mod error;

pub use client::{verify_payload, AttachmentClient, PreparedAttachment, VerificationPolicy};
pub use config::Config;
pub use descriptor::{DescriptorSummary, RemoteAttachment, HTTPS_SCHEME};
pub use error::{ClientError, Result};

// Re-export the types callers handle directly
pub use sealdrop_crypto::{Attachment, ContentDigest, EncryptedAttachment, KeyMaterial};
pub use sealdrop_storage::{BackendChain, Fetcher, MemoryBackend, StorageBackend, StorageConfig};
