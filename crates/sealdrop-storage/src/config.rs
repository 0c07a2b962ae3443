//! Storage configuration
//!
//! Credentials are read once into a `StorageConfig` and handed to the
//! backends. A provider whose credentials are absent (or empty) is disabled.

use std::time::Duration;

/// Environment variable holding the Pinata API key
pub const PINATA_API_KEY: &str = "PINATA_API_KEY";
/// Environment variable holding the Pinata API secret
pub const PINATA_API_SECRET: &str = "PINATA_API_SECRET";
/// Environment variable overriding the Pinata API endpoint
pub const PINATA_API_URL: &str = "PINATA_API_URL";
/// Environment variable overriding the Pinata gateway
pub const PINATA_GATEWAY_URL: &str = "PINATA_GATEWAY_URL";
/// Environment variable holding the web3.storage bearer token
pub const WEB3_STORAGE_TOKEN: &str = "WEB3_STORAGE_TOKEN";
/// Environment variable overriding the web3.storage API endpoint
pub const WEB3_STORAGE_API_URL: &str = "WEB3_STORAGE_API_URL";
/// Environment variable overriding the HTTP timeout (seconds)
pub const HTTP_TIMEOUT_SECS: &str = "SEALDROP_HTTP_TIMEOUT_SECS";

/// Pinata credentials and endpoints
#[derive(Clone)]
pub struct PinataConfig {
    /// API key (`pinata_api_key` header)
    pub api_key: Option<String>,
    /// API secret (`pinata_secret_api_key` header)
    pub api_secret: Option<String>,
    /// API base URL
    pub api_url: String,
    /// Public gateway base URL
    pub gateway_url: String,
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            api_url: "https://api.pinata.cloud".to_string(),
            gateway_url: "https://gateway.pinata.cloud".to_string(),
        }
    }
}

impl PinataConfig {
    /// Create with an API key/secret pair
    pub fn with_credentials(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Default::default()
        }
    }

    /// Set the API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the gateway base URL
    pub fn with_gateway_url(mut self, gateway_url: impl Into<String>) -> Self {
        self.gateway_url = gateway_url.into();
        self
    }

    /// Both halves of the credential pair are present
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }
}

/// web3.storage credentials and endpoints
#[derive(Clone)]
pub struct Web3StorageConfig {
    /// Bearer token
    pub token: Option<String>,
    /// API base URL
    pub api_url: String,
    /// Subdomain gateway domain; objects resolve at `https://<cid>.<domain>/<filename>`
    pub link_domain: String,
}

impl Default for Web3StorageConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.web3.storage".to_string(),
            link_domain: "ipfs.w3s.link".to_string(),
        }
    }
}

impl Web3StorageConfig {
    /// Create with a bearer token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Set the API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn redacted(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

impl std::fmt::Debug for PinataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("api_secret", &redacted(&self.api_secret))
            .field("api_url", &self.api_url)
            .field("gateway_url", &self.gateway_url)
            .finish()
    }
}

impl std::fmt::Debug for Web3StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Web3StorageConfig")
            .field("token", &redacted(&self.token))
            .field("api_url", &self.api_url)
            .field("link_domain", &self.link_domain)
            .finish()
    }
}

/// Configuration for every storage backend
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Pinata (tried first)
    pub pinata: PinataConfig,
    /// web3.storage (tried second)
    pub web3_storage: Web3StorageConfig,
    /// Timeout applied to every upload request
    pub timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            pinata: PinataConfig::default(),
            web3_storage: Web3StorageConfig::default(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl StorageConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        config.pinata.api_key = get(PINATA_API_KEY);
        config.pinata.api_secret = get(PINATA_API_SECRET);
        if let Some(api_url) = get(PINATA_API_URL) {
            config.pinata.api_url = api_url;
        }
        if let Some(gateway_url) = get(PINATA_GATEWAY_URL) {
            config.pinata.gateway_url = gateway_url;
        }

        config.web3_storage.token = get(WEB3_STORAGE_TOKEN);
        if let Some(api_url) = get(WEB3_STORAGE_API_URL) {
            config.web3_storage.api_url = api_url;
        }

        if let Some(secs) = get(HTTP_TIMEOUT_SECS).and_then(|s| s.parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }

        config
    }

    /// Set the pinata configuration
    pub fn with_pinata(mut self, pinata: PinataConfig) -> Self {
        self.pinata = pinata;
        self
    }

    /// Set the web3.storage configuration
    pub fn with_web3_storage(mut self, web3_storage: Web3StorageConfig) -> Self {
        self.web3_storage = web3_storage;
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_empty_environment_disables_everything() {
        let config = StorageConfig::from_lookup(lookup(&[]));
        assert!(!config.pinata.has_credentials());
        assert!(config.web3_storage.token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_pinata_needs_both_halves() {
        let config = StorageConfig::from_lookup(lookup(&[(PINATA_API_KEY, "key")]));
        assert!(!config.pinata.has_credentials());

        let config = StorageConfig::from_lookup(lookup(&[
            (PINATA_API_KEY, "key"),
            (PINATA_API_SECRET, "secret"),
        ]));
        assert!(config.pinata.has_credentials());
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = StorageConfig::from_lookup(lookup(&[(WEB3_STORAGE_TOKEN, "  ")]));
        assert!(config.web3_storage.token.is_none());
    }

    #[test]
    fn test_debug_hides_credentials() {
        let pinata = PinataConfig::with_credentials("key-123", "secret-456");
        let debug = format!("{:?}", pinata);
        assert!(!debug.contains("key-123"));
        assert!(!debug.contains("secret-456"));
    }

    #[test]
    fn test_overrides() {
        let config = StorageConfig::from_lookup(lookup(&[
            (PINATA_API_URL, "http://localhost:1234"),
            (WEB3_STORAGE_API_URL, "http://localhost:5678"),
            (HTTP_TIMEOUT_SECS, "5"),
        ]));
        assert_eq!(config.pinata.api_url, "http://localhost:1234");
        assert_eq!(config.web3_storage.api_url, "http://localhost:5678");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
