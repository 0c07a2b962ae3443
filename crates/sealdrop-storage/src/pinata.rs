//! Pinata pinning backend
//!
//! Uploads through the `pinFileToIPFS` endpoint and resolves objects through
//! the Pinata gateway: `https://gateway.pinata.cloud/ipfs/<IpfsHash>`.

use crate::{
    cid_utils::parse_cid,
    config::{PinataConfig, PINATA_API_KEY, PINATA_API_SECRET},
    Result, StorageBackend, StorageError,
};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Backend name used in logs and errors
pub const PINATA: &str = "pinata";

/// Successful `pinFileToIPFS` response
#[derive(Clone, Debug, Deserialize)]
pub struct PinFileResponse {
    /// CID of the pinned file
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    /// Pinned size in bytes
    #[serde(rename = "PinSize", default)]
    pub pin_size: Option<u64>,
    /// Pin timestamp
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
}

/// Pinata IPFS pinning backend
#[derive(Clone)]
pub struct PinataBackend {
    client: Client,
    config: PinataConfig,
}

impl PinataBackend {
    /// Create a new Pinata backend
    pub fn new(config: PinataConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &PinataConfig {
        &self.config
    }

    /// Public gateway URL for a CID
    pub fn gateway_url(&self, cid: &str) -> String {
        format!("{}/ipfs/{}", self.config.gateway_url.trim_end_matches('/'), cid)
    }

    fn upload_error(reason: impl Into<String>) -> StorageError {
        StorageError::UploadFailed {
            backend: PINATA.to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl StorageBackend for PinataBackend {
    fn name(&self) -> &str {
        PINATA
    }

    fn is_configured(&self) -> bool {
        self.config.has_credentials()
    }

    fn required_credentials(&self) -> Vec<String> {
        vec![PINATA_API_KEY.to_string(), PINATA_API_SECRET.to_string()]
    }

    #[instrument(skip(self, data), fields(len = data.len()))]
    async fn upload(&self, data: Bytes, filename: &str) -> Result<String> {
        let (Some(api_key), Some(api_secret)) = (&self.config.api_key, &self.config.api_secret) else {
            return Err(StorageError::ConfigurationMissing {
                required: vec![format!("{}/{}", PINATA_API_KEY, PINATA_API_SECRET)],
            });
        };

        let url = format!("{}/pinning/pinFileToIPFS", self.config.api_url.trim_end_matches('/'));
        let part = multipart::Part::bytes(data.to_vec()).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .header("pinata_api_key", api_key)
            .header("pinata_secret_api_key", api_secret)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::upload_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(Self::upload_error(format!("HTTP {}: {}", status, error)));
        }

        let body: PinFileResponse = response
            .json()
            .await
            .map_err(|e| Self::upload_error(format!("unexpected response: {}", e)))?;

        let cid = parse_cid(&body.ipfs_hash).map_err(|e| Self::upload_error(e.to_string()))?;
        debug!(cid = %cid, pin_size = ?body.pin_size, "pinned to pinata");

        Ok(self.gateway_url(&body.ipfs_hash))
    }
}
