//! Remote attachment descriptor
//!
//! The descriptor is what the messaging layer sends. It names where the
//! ciphertext lives and carries everything needed to decrypt it, including
//! the secret, so it must only travel over a confidential channel.

use crate::{ClientError, Result};
use sealdrop_crypto::{AttachmentSecret, ContentDigest, EncryptedAttachment, KeyMaterial, Nonce, Salt};
use serde::{Deserialize, Serialize};

/// Scheme expected on descriptor URLs
pub const HTTPS_SCHEME: &str = "https://";

/// A reference to an encrypted object in remote storage plus its key material
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAttachment {
    /// Where the ciphertext can be fetched
    pub url: String,
    /// SHA-256 of the ciphertext at `url`
    pub content_digest: ContentDigest,
    /// HKDF salt
    pub salt: Salt,
    /// AES-GCM nonce
    pub nonce: Nonce,
    /// HKDF input keying material
    pub secret: AttachmentSecret,
    /// Scheme prefix of `url`; `https://` for every provider URL
    pub scheme: String,
    /// Ciphertext length in bytes
    pub content_length: u64,
    /// Original file name
    pub filename: String,
}

impl RemoteAttachment {
    /// Describe an encrypted attachment stored at `url`
    pub fn from_encrypted(encrypted: &EncryptedAttachment, url: impl Into<String>) -> Self {
        let url = url.into();
        let scheme = scheme_of(&url);

        Self {
            url,
            content_digest: encrypted.digest,
            salt: encrypted.salt().clone(),
            nonce: encrypted.nonce().clone(),
            secret: encrypted.secret().clone(),
            scheme,
            content_length: encrypted.content_length(),
            filename: encrypted.filename.clone(),
        }
    }

    /// Point the descriptor at a new location; `scheme` follows the URL
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
        self.scheme = scheme_of(&self.url);
    }

    /// Key material for decrypting the referenced object
    pub fn material(&self) -> KeyMaterial {
        KeyMaterial {
            secret: self.secret.clone(),
            salt: self.salt.clone(),
            nonce: self.nonce.clone(),
        }
    }

    /// Check that the URL parses and agrees with the declared scheme.
    ///
    /// Plain `http://` is refused unless `allow_insecure_http` is set.
    pub fn validate(&self, allow_insecure_http: bool) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| ClientError::InvalidDescriptor(format!("bad url '{}': {}", self.url, e)))?;

        if !self.url.starts_with(&self.scheme) {
            return Err(ClientError::InvalidDescriptor(format!(
                "url '{}' does not use declared scheme '{}'",
                self.url, self.scheme
            )));
        }

        match parsed.scheme() {
            "https" => Ok(()),
            "http" if allow_insecure_http => Ok(()),
            other => Err(ClientError::InvalidDescriptor(format!(
                "scheme '{}' is not allowed",
                other
            ))),
        }
    }

    /// Serialize as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Public, non-secret view of the descriptor
    pub fn summary(&self) -> DescriptorSummary {
        DescriptorSummary {
            url: self.url.clone(),
            filename: self.filename.clone(),
            content_length: self.content_length,
            content_digest: self.content_digest.to_hex(),
        }
    }
}

/// `https://` unless the URL names another scheme
fn scheme_of(url: &str) -> String {
    url.split_once("://")
        .map(|(scheme, _)| format!("{}://", scheme))
        .unwrap_or_else(|| HTTPS_SCHEME.to_string())
}

/// Descriptor fields that are safe to display or log
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorSummary {
    pub url: String,
    pub filename: String,
    pub content_length: u64,
    pub content_digest: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealdrop_crypto::encrypt_attachment;

    fn descriptor(url: &str) -> RemoteAttachment {
        let encrypted = encrypt_attachment(b"hello", "hello.txt", "text/plain").unwrap();
        RemoteAttachment::from_encrypted(&encrypted, url)
    }

    #[test]
    fn test_from_encrypted() {
        let encrypted = encrypt_attachment(b"hello", "hello.txt", "text/plain").unwrap();
        let d = RemoteAttachment::from_encrypted(&encrypted, "https://example/ipfs/abc");

        assert_eq!(d.scheme, HTTPS_SCHEME);
        assert_eq!(d.filename, "hello.txt");
        assert_eq!(d.content_digest, encrypted.digest);
        assert_eq!(d.content_length, encrypted.payload.len() as u64);
        assert_eq!(d.material().secret, encrypted.material.secret);
    }

    #[test]
    fn test_scheme_mirrors_url() {
        let mut d = descriptor(HTTPS_SCHEME);
        assert_eq!(d.scheme, HTTPS_SCHEME);

        d.set_url("http://localhost:8080/ipfs/abc");
        assert_eq!(d.scheme, "http://");
        assert!(d.validate(true).is_ok());

        d.set_url("https://gateway.example/ipfs/abc");
        assert_eq!(d.scheme, HTTPS_SCHEME);
        assert_eq!(d.url, "https://gateway.example/ipfs/abc");
        assert!(d.validate(false).is_ok());
    }

    #[test]
    fn test_json_roundtrip_uses_camel_case() {
        let d = descriptor("https://example/ipfs/abc");
        let json = d.to_json().unwrap();

        assert!(json.contains("\"contentDigest\""));
        assert!(json.contains("\"contentLength\""));
        assert_eq!(RemoteAttachment::from_json(&json).unwrap(), d);
    }

    #[test]
    fn test_json_with_short_secret_rejected() {
        let d = descriptor("https://example/ipfs/abc");
        let mut value: serde_json::Value = serde_json::from_str(&d.to_json().unwrap()).unwrap();
        value["secret"] = serde_json::Value::String("AAAA".to_string());

        assert!(RemoteAttachment::from_json(&value.to_string()).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(descriptor("https://example/ipfs/abc").validate(false).is_ok());
        assert!(descriptor("http://localhost/ipfs/abc").validate(false).is_err());
        assert!(descriptor("http://localhost/ipfs/abc").validate(true).is_ok());
        assert!(descriptor("ftp://example/abc").validate(true).is_err());
        assert!(descriptor("not a url").validate(true).is_err());

        let mut d = descriptor("https://example/ipfs/abc");
        d.scheme = "http://".to_string();
        assert!(d.validate(true).is_err());
    }

    #[test]
    fn test_debug_and_summary_hide_secret() {
        let d = descriptor("https://example/ipfs/abc");
        let secret = d.secret.to_base64();

        assert!(!format!("{:?}", d).contains(&secret));
        let summary = serde_json::to_string(&d.summary()).unwrap();
        assert!(!summary.contains(&secret));
        assert!(summary.contains("hello.txt"));
    }
}
