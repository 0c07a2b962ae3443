//! HTTP retrieval of stored objects

use crate::{Fetcher, Result, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches objects with a plain GET against their public URL
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with a bounded request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_user_agent(timeout, concat!("sealdrop-storage/", env!("CARGO_PKG_VERSION")))
    }

    /// Create a fetcher with a bounded request timeout and a custom user agent
    pub fn with_user_agent(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let failed = |reason: String| StorageError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let parsed = url::Url::parse(url)?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("HTTP {}", response.status())));
        }

        let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
        debug!(len = bytes.len(), "fetched object");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ipfs/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let bytes = fetcher
            .fetch(&format!("{}/ipfs/abc", server.uri()))
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_not_found_is_download_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(&format!("{}/ipfs/missing", server.uri()))
            .await
            .unwrap_err();

        match err {
            StorageError::DownloadFailed { reason, .. } => assert!(reason.contains("404")),
            other => panic!("expected DownloadFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::header("user-agent", "sealdrop-test/1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::with_user_agent(Duration::from_secs(5), "sealdrop-test/1").unwrap();
        fetcher.fetch(&format!("{}/x", server.uri())).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidUrl(_)));
    }
}
