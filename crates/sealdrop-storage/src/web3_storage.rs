//! web3.storage backend
//!
//! Uploads through `POST /upload` with a bearer token and resolves objects via
//! the subdomain gateway: `https://<cid>.ipfs.w3s.link/<filename>`.

use crate::{
    cid_utils::parse_cid,
    config::{Web3StorageConfig, WEB3_STORAGE_TOKEN},
    Result, StorageBackend, StorageError,
};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Backend name used in logs and errors
pub const WEB3_STORAGE: &str = "web3.storage";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    cid: String,
}

/// web3.storage upload backend
#[derive(Clone)]
pub struct Web3StorageBackend {
    client: Client,
    config: Web3StorageConfig,
}

impl Web3StorageBackend {
    /// Create a new web3.storage backend
    pub fn new(config: Web3StorageConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Public link for a CID and file name
    pub fn link(&self, cid: &str, filename: &str) -> String {
        format!(
            "https://{}.{}/{}",
            cid,
            self.config.link_domain,
            urlencoding::encode(filename)
        )
    }

    fn upload_error(reason: impl Into<String>) -> StorageError {
        StorageError::UploadFailed {
            backend: WEB3_STORAGE.to_string(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl StorageBackend for Web3StorageBackend {
    fn name(&self) -> &str {
        WEB3_STORAGE
    }

    fn is_configured(&self) -> bool {
        self.config.token.is_some()
    }

    fn required_credentials(&self) -> Vec<String> {
        vec![WEB3_STORAGE_TOKEN.to_string()]
    }

    #[instrument(skip(self, data), fields(len = data.len()))]
    async fn upload(&self, data: Bytes, filename: &str) -> Result<String> {
        let Some(token) = &self.config.token else {
            return Err(StorageError::ConfigurationMissing {
                required: vec![WEB3_STORAGE_TOKEN.to_string()],
            });
        };

        let url = format!("{}/upload", self.config.api_url.trim_end_matches('/'));
        let part = multipart::Part::bytes(data.to_vec()).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Self::upload_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(Self::upload_error(format!("HTTP {}: {}", status, error)));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| Self::upload_error(format!("unexpected response: {}", e)))?;

        // Subdomain gateways need a case-insensitive (base32 v1) CID
        let cid = parse_cid(&body.cid)
            .and_then(|cid| cid.into_v1().map_err(|e| StorageError::Deserialization(e.to_string())))
            .map_err(|e| Self::upload_error(e.to_string()))?;
        debug!(cid = %cid, "stored on web3.storage");

        Ok(self.link(&cid.to_string(), filename))
    }
}
