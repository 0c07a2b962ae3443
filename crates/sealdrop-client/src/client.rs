//! Attachment client: the produce/consume boundary
//!
//! `upload` turns local bytes into a [`RemoteAttachment`]; `load` turns a
//! [`RemoteAttachment`] back into the original bytes.

use crate::{
    descriptor::{RemoteAttachment, HTTPS_SCHEME},
    ClientError, Config, Result,
};
use bytes::Bytes;
use sealdrop_crypto::{decrypt_attachment, encrypt_attachment, Attachment, ContentDigest};
use sealdrop_storage::{BackendChain, Fetcher, HttpFetcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Filename used when a path has no usable final component
const FALLBACK_FILENAME: &str = "file";

/// Whether to check the content digest before decrypting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerificationPolicy {
    /// Check length and SHA-256 of the fetched bytes against the descriptor
    #[default]
    Verify,
    /// Skip the digest check.
    ///
    /// Only for gateways known to serve inconsistent bytes. AES-GCM
    /// authentication still runs, so tampering surfaces as `DecryptionFailed`.
    SkipDigestCheck,
}

/// Ciphertext and descriptor for an object the caller hosts themselves
#[derive(Clone, Debug)]
pub struct PreparedAttachment {
    /// Descriptor pointing at the caller-chosen URL
    pub descriptor: RemoteAttachment,
    /// Bytes that must be served at `descriptor.url`
    pub payload: Bytes,
}

/// Encrypting upload/download client
pub struct AttachmentClient {
    chain: BackendChain,
    fetcher: Arc<dyn Fetcher>,
    allow_insecure_http: bool,
}

impl AttachmentClient {
    /// Create a client with the standard backend chain and an HTTP fetcher
    pub fn new(config: Config) -> Result<Self> {
        let chain = BackendChain::from_config(&config.storage)?;
        let fetcher = HttpFetcher::with_user_agent(config.fetch_timeout, &config.user_agent)?;
        Ok(Self::with_parts(chain, Arc::new(fetcher)))
    }

    /// Create a client from explicit parts
    pub fn with_parts(chain: BackendChain, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            chain,
            fetcher,
            allow_insecure_http: false,
        }
    }

    /// Accept descriptors with plain `http://` URLs
    pub fn allow_insecure_http(mut self, allow: bool) -> Self {
        self.allow_insecure_http = allow;
        self
    }

    /// Get the backend chain
    pub fn chain(&self) -> &BackendChain {
        &self.chain
    }

    // ==================== Produce ====================

    /// Encrypt `data`, upload the ciphertext and describe it
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn upload(&self, data: &[u8], filename: &str, mime_type: &str) -> Result<RemoteAttachment> {
        let encrypted = encrypt_attachment(data, filename, mime_type)?;
        // Describe first so the ciphertext can move into the upload
        let mut descriptor = RemoteAttachment::from_encrypted(&encrypted, HTTPS_SCHEME);
        let payload = Bytes::from(encrypted.payload);

        let receipt = self
            .chain
            .upload_with_fallback(payload, filename, mime_type)
            .await?;

        info!(
            backend = %receipt.backend,
            content_length = descriptor.content_length,
            "attachment uploaded"
        );
        descriptor.set_url(receipt.url);
        Ok(descriptor)
    }

    /// Read a file and upload it; the MIME type is guessed from the extension when absent
    #[instrument(skip(self))]
    pub async fn upload_file(&self, path: &Path, mime_type: Option<&str>) -> Result<RemoteAttachment> {
        let data = tokio::fs::read(path).await?;
        let filename = filename_of(path);
        let mime_type = resolve_mime(path, mime_type);
        self.upload(&data, &filename, &mime_type).await
    }

    /// Encrypt a file for a URL the caller will host; nothing is uploaded
    pub async fn describe_hosted(
        path: &Path,
        url: &str,
        mime_type: Option<&str>,
    ) -> Result<PreparedAttachment> {
        let data = tokio::fs::read(path).await?;
        let encrypted = encrypt_attachment(&data, &filename_of(path), &resolve_mime(path, mime_type))?;
        let descriptor = RemoteAttachment::from_encrypted(&encrypted, url);

        Ok(PreparedAttachment {
            descriptor,
            payload: Bytes::from(encrypted.payload),
        })
    }

    // ==================== Consume ====================

    /// Fetch, optionally verify, decrypt and unwrap a remote attachment
    #[instrument(skip(self, descriptor), fields(url = %descriptor.url))]
    pub async fn load(&self, descriptor: &RemoteAttachment, policy: VerificationPolicy) -> Result<Attachment> {
        descriptor.validate(self.allow_insecure_http)?;

        let payload = self.fetcher.fetch(&descriptor.url).await?;
        debug!(len = payload.len(), "ciphertext fetched");

        match policy {
            VerificationPolicy::Verify => verify_payload(descriptor, &payload)?,
            VerificationPolicy::SkipDigestCheck => {
                warn!(url = %descriptor.url, "digest verification skipped by caller");
            }
        }

        let attachment = decrypt_attachment(&payload, &descriptor.material())?;
        info!(filename = %attachment.filename, len = attachment.data.len(), "attachment decrypted");
        Ok(attachment)
    }

    /// Load an attachment and write it into `dir` under its own file name
    pub async fn load_to_dir(
        &self,
        descriptor: &RemoteAttachment,
        policy: VerificationPolicy,
        dir: &Path,
    ) -> Result<PathBuf> {
        let attachment = self.load(descriptor, policy).await?;
        // Never let a remote file name escape `dir`
        let target = dir.join(filename_of(Path::new(&attachment.filename)));
        tokio::fs::write(&target, &attachment.data).await?;
        Ok(target)
    }
}

/// Check fetched bytes against the descriptor's length and digest
pub fn verify_payload(descriptor: &RemoteAttachment, payload: &[u8]) -> Result<()> {
    if payload.len() as u64 != descriptor.content_length {
        return Err(ClientError::IntegrityMismatch {
            expected: format!("{} bytes", descriptor.content_length),
            actual: format!("{} bytes", payload.len()),
        });
    }

    let actual = ContentDigest::of(payload);
    if actual != descriptor.content_digest {
        return Err(ClientError::IntegrityMismatch {
            expected: descriptor.content_digest.to_hex(),
            actual: actual.to_hex(),
        });
    }
    Ok(())
}

fn filename_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_FILENAME)
        .to_string()
}

fn resolve_mime(path: &Path, mime_type: Option<&str>) -> String {
    match mime_type {
        Some(mime) => mime.to_string(),
        None => mime_guess::from_path(path).first_or_octet_stream().essence_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sealdrop_storage::{MemoryBackend, StorageError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory_client() -> (AttachmentClient, Arc<MemoryBackend>) {
        let memory = Arc::new(MemoryBackend::new());
        let chain = BackendChain::new().with_shared_backend(memory.clone());
        (AttachmentClient::with_parts(chain, memory.clone()), memory)
    }

    #[tokio::test]
    async fn test_upload_then_load() {
        let (client, _) = memory_client();
        let descriptor = client.upload(b"hello", "hello.txt", "text/plain").await.unwrap();
        let attachment = client.load(&descriptor, VerificationPolicy::Verify).await.unwrap();

        assert_eq!(attachment.filename, "hello.txt");
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.data, b"hello");
    }

    #[tokio::test]
    async fn test_descriptor_matches_stored_bytes() {
        let (client, memory) = memory_client();
        let descriptor = client.upload(b"abc", "a.txt", "text/plain").await.unwrap();
        let stored = memory.get(&descriptor.url).unwrap();

        assert_eq!(descriptor.content_length, stored.len() as u64);
        assert!(descriptor.content_digest.matches(&stored));
    }

    #[tokio::test]
    async fn test_truncated_payload_is_integrity_mismatch() {
        let (client, memory) = memory_client();
        let descriptor = client.upload(b"abcdef", "a.txt", "text/plain").await.unwrap();
        let stored = memory.get(&descriptor.url).unwrap();
        memory.overwrite(&descriptor.url, stored.slice(..stored.len() - 1));

        let err = client.load(&descriptor, VerificationPolicy::Verify).await.unwrap_err();
        assert!(matches!(err, ClientError::IntegrityMismatch { .. }));
    }

    #[tokio::test]
    async fn test_missing_object_is_download_failed() {
        let (client, memory) = memory_client();
        let descriptor = client.upload(b"x", "x.bin", "application/octet-stream").await.unwrap();
        memory.clear();

        let err = client.load(&descriptor, VerificationPolicy::Verify).await.unwrap_err();
        assert!(matches!(err, ClientError::DownloadFailed { .. }));
    }

    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> sealdrop_storage::Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::DownloadFailed {
                url: url.to_string(),
                reason: "unreachable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_insecure_descriptor_rejected_before_fetch() {
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
        });
        let client = AttachmentClient::with_parts(BackendChain::new(), fetcher.clone());

        let encrypted = encrypt_attachment(b"x", "x.bin", "application/octet-stream").unwrap();
        let descriptor = RemoteAttachment::from_encrypted(&encrypted, "http://example/ipfs/abc");

        let err = client.load(&descriptor, VerificationPolicy::Verify).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidDescriptor(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upload_file_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let (client, _) = memory_client();
        let descriptor = client.upload_file(&path, None).await.unwrap();
        assert_eq!(descriptor.filename, "photo.png");

        let attachment = client.load(&descriptor, VerificationPolicy::Verify).await.unwrap();
        assert_eq!(attachment.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_load_to_dir_strips_directories() {
        let memory = Arc::new(MemoryBackend::new());
        let client = AttachmentClient::with_parts(
            BackendChain::new().with_shared_backend(memory.clone()),
            memory.clone(),
        );
        let descriptor = client
            .upload(b"evil", "../../etc/passwd", "text/plain")
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let written = client
            .load_to_dir(&descriptor, VerificationPolicy::Verify, dir.path())
            .await
            .unwrap();

        assert_eq!(written, dir.path().join("passwd"));
        assert_eq!(std::fs::read(&written).unwrap(), b"evil");
    }

    #[tokio::test]
    async fn test_describe_hosted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let prepared = AttachmentClient::describe_hosted(&path, "https://example/ipfs/doc", None)
            .await
            .unwrap();

        assert_eq!(prepared.descriptor.url, "https://example/ipfs/doc");
        assert_eq!(prepared.descriptor.content_length, prepared.payload.len() as u64);
        assert!(verify_payload(&prepared.descriptor, &prepared.payload).is_ok());

        let attachment = decrypt_attachment(&prepared.payload, &prepared.descriptor.material()).unwrap();
        assert_eq!(attachment.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_load_over_http_gateway() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let gateway = MockServer::start().await;
        let encrypted = encrypt_attachment(b"from the gateway", "g.txt", "text/plain").unwrap();

        Mock::given(method("GET"))
            .and(path("/ipfs/g"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(encrypted.payload.clone()))
            .expect(1)
            .mount(&gateway)
            .await;

        let descriptor = RemoteAttachment::from_encrypted(&encrypted, format!("{}/ipfs/g", gateway.uri()));

        let client = AttachmentClient::new(Config::default())
            .unwrap()
            .allow_insecure_http(true);
        let attachment = client.load(&descriptor, VerificationPolicy::Verify).await.unwrap();

        assert_eq!(attachment.data, b"from the gateway");
        assert_eq!(attachment.filename, "g.txt");
    }

    #[test]
    fn test_filename_fallback() {
        assert_eq!(filename_of(Path::new("/tmp/photo.png")), "photo.png");
        assert_eq!(filename_of(Path::new("/")), FALLBACK_FILENAME);
        assert_eq!(filename_of(Path::new("..")), FALLBACK_FILENAME);
    }

    #[test]
    fn test_default_policy_verifies() {
        assert_eq!(VerificationPolicy::default(), VerificationPolicy::Verify);
    }
}
