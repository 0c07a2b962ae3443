//! CLI configuration

use sealdrop_client::Config;
use sealdrop_storage::StorageConfig;
use std::time::Duration;

/// Settings that come from flags rather than backend credentials
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    /// Overrides the HTTP timeout for uploads and downloads
    pub timeout_secs: Option<u64>,
    /// Accept `http://` descriptor URLs
    pub allow_insecure_http: bool,
}

impl CliConfig {
    /// Build the client configuration from the environment plus flag overrides
    pub fn client_config(&self) -> Config {
        self.apply(StorageConfig::from_env())
    }

    fn apply(&self, storage: StorageConfig) -> Config {
        match self.timeout_secs {
            Some(secs) => {
                let timeout = Duration::from_secs(secs);
                Config::new(storage.with_timeout(timeout)).with_fetch_timeout(timeout)
            }
            None => Config::new(storage),
        }
    }
}
