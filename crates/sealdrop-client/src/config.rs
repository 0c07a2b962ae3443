//! Client configuration

use sealdrop_storage::StorageConfig;
use std::time::Duration;

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Storage backend credentials and upload timeout
    pub storage: StorageConfig,
    /// Timeout for fetching ciphertext from a gateway
    pub fetch_timeout: Duration,
    /// User agent string sent on downloads
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            fetch_timeout: Duration::from_secs(30),
            user_agent: format!("sealdrop-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Create a config around the given storage configuration
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            storage,
            ..Default::default()
        }
    }

    /// Read storage credentials from the process environment
    pub fn from_env() -> Self {
        Self::new(StorageConfig::from_env())
    }

    /// Set the fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}
