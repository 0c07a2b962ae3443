//! Error types for the sealdrop-storage crate

use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// One failed attempt inside a fallback chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedAttempt {
    /// Backend name
    pub backend: String,
    /// Why the upload failed
    pub reason: String,
}

impl std::fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.backend, self.reason)
    }
}

fn join_attempts(attempts: &[FailedAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// No backend has credentials
    #[error("no storage backend configured; set {}", .required.join(" or "))]
    ConfigurationMissing { required: Vec<String> },

    /// A single backend's upload failed
    #[error("{backend} upload failed: {reason}")]
    UploadFailed { backend: String, reason: String },

    /// Every configured backend failed
    #[error("no storage backend available ({}); configured via {}", join_attempts(.attempts), .required.join(" or "))]
    NoStorageAvailable {
        attempts: Vec<FailedAttempt>,
        required: Vec<String>,
    },

    /// Fetching stored bytes failed
    #[error("failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Timeout error
    #[error("request timed out: {0}")]
    Timeout(String),

    /// HTTP error
    #[error("http error: {0}")]
    Http(String),

    /// Deserialization error
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StorageError::Timeout(err.to_string())
        } else if err.is_connect() {
            StorageError::Connection(err.to_string())
        } else {
            StorageError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Deserialization(err.to_string())
    }
}

impl From<url::ParseError> for StorageError {
    fn from(err: url::ParseError) -> Self {
        StorageError::InvalidUrl(err.to_string())
    }
}
