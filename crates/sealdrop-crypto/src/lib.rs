//! # Sealdrop Crypto
//!
//! Cryptographic primitives for sealdrop encrypted remote attachments.
//!
//! This crate provides:
//! - **Envelope codec**: Self-describing DAG-CBOR wrapper for filename, MIME type and bytes
//! - **Key derivation**: HKDF-SHA256 from a random per-attachment secret and salt
//! - **AES-256-GCM**: Authenticated encryption of the envelope
//! - **SHA-256**: Content digest over the ciphertext
//!
//! ## Security Model
//!
//! - Key material is generated fresh for every attachment and never reused
//! - Storage providers only ever see ciphertext
//! - The key material travels inside the descriptor, so whoever holds the
//!   descriptor can decrypt; protect the channel that carries it
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealdrop_crypto::{encrypt_attachment, decrypt_attachment};
//!
//! let encrypted = encrypt_attachment(b"Hello, World!", "hello.txt", "text/plain")?;
//! let attachment = decrypt_attachment(&encrypted.payload, &encrypted.material)?;
//! assert_eq!(attachment.data, b"Hello, World!");
//! ```

pub mod attachment;
pub mod envelope;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod symmetric;

pub use attachment::{decrypt_attachment, encrypt_attachment, encrypt_attachment_with, EncryptedAttachment};
pub use envelope::{Attachment, ContentTypeId};
pub use error::{CryptoError, Result};
pub use hashing::{digest, ContentDigest};
pub use keys::{AttachmentSecret, DerivedKey, KeyMaterial, Salt};
pub use symmetric::{Aead, Nonce};
