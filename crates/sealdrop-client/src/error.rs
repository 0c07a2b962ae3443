//! Client error types

use sealdrop_crypto::CryptoError;
use sealdrop_storage::{FailedAttempt, StorageError};
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

fn join_attempts(attempts: &[FailedAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// No storage backend has credentials
    #[error("no storage backend configured; set {}", .required.join(" or "))]
    ConfigurationMissing { required: Vec<String> },

    /// Every configured storage backend failed
    #[error(
        "all storage backends failed: {}; check {}",
        join_attempts(.attempts),
        .required.join(" or ")
    )]
    NoStorageAvailable {
        attempts: Vec<FailedAttempt>,
        required: Vec<String>,
    },

    /// Fetching the ciphertext failed
    #[error("download of {url} failed: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Fetched bytes do not match the descriptor
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    /// Authentication tag check failed or ciphertext is malformed
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// Decrypted bytes are not an attachment envelope
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The descriptor itself is unusable
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Other storage error
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Other cryptographic error
    #[error("crypto error: {0}")]
    Crypto(CryptoError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for ClientError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConfigurationMissing { required } => Self::ConfigurationMissing { required },
            StorageError::NoStorageAvailable { attempts, required } => {
                Self::NoStorageAvailable { attempts, required }
            }
            StorageError::DownloadFailed { url, reason } => Self::DownloadFailed { url, reason },
            other => Self::Storage(other),
        }
    }
}

impl From<CryptoError> for ClientError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Decryption(reason) => Self::DecryptionFailed(reason),
            CryptoError::MalformedEnvelope(reason) => Self::MalformedEnvelope(reason),
            other => Self::Crypto(other),
        }
    }
}

impl ClientError {
    /// Whether the error came from the integrity or authentication checks
    pub fn is_tampering(&self) -> bool {
        matches!(self, Self::IntegrityMismatch { .. } | Self::DecryptionFailed(_))
    }
}
