//! Attachment envelope codec
//!
//! An attachment travels as a self-describing DAG-CBOR document:
//!
//! ```text
//! {
//!   "type":       { "authorityId": "sealdrop.dev", "typeId": "attachment", "versionMajor": 1, "versionMinor": 0 },
//!   "parameters": { "filename": "...", "mimeType": "..." },
//!   "content":    <bytes>
//! }
//! ```
//!
//! DAG-CBOR is canonical and parameters live in a `BTreeMap`, so encoding the
//! same attachment twice yields identical bytes.

use crate::{CryptoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authority that owns the attachment content type
pub const ATTACHMENT_AUTHORITY: &str = "sealdrop.dev";

/// Type identifier of the attachment content type
pub const ATTACHMENT_TYPE_ID: &str = "attachment";

/// Major version understood by this codec
pub const ATTACHMENT_VERSION_MAJOR: u32 = 1;

const PARAM_FILENAME: &str = "filename";
const PARAM_MIME_TYPE: &str = "mimeType";

/// A decoded attachment
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name
    pub filename: String,
    /// MIME type of `data`
    pub mime_type: String,
    /// Raw file content
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create a new attachment
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Encode into envelope bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(&self.filename, &self.mime_type, &self.data)
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Content type tag carried inside every envelope
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeId {
    pub authority_id: String,
    pub type_id: String,
    pub version_major: u32,
    pub version_minor: u32,
}

impl ContentTypeId {
    /// The attachment content type
    pub fn attachment() -> Self {
        Self {
            authority_id: ATTACHMENT_AUTHORITY.to_string(),
            type_id: ATTACHMENT_TYPE_ID.to_string(),
            version_major: ATTACHMENT_VERSION_MAJOR,
            version_minor: 0,
        }
    }

    /// Whether this codec can decode content tagged with `self`
    pub fn is_attachment(&self) -> bool {
        self.authority_id == ATTACHMENT_AUTHORITY
            && self.type_id == ATTACHMENT_TYPE_ID
            && self.version_major == ATTACHMENT_VERSION_MAJOR
    }
}

impl std::fmt::Display for ContentTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}:{}.{}",
            self.authority_id, self.type_id, self.version_major, self.version_minor
        )
    }
}

#[derive(Serialize, Deserialize)]
struct EncodedContent {
    #[serde(rename = "type", default)]
    content_type: Option<ContentTypeId>,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
    #[serde(with = "serde_bytes")]
    content: Vec<u8>,
}

/// Serialize an attachment into envelope bytes
pub fn encode(filename: &str, mime_type: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mut parameters = BTreeMap::new();
    parameters.insert(PARAM_FILENAME.to_string(), filename.to_string());
    parameters.insert(PARAM_MIME_TYPE.to_string(), mime_type.to_string());

    let encoded = EncodedContent {
        content_type: Some(ContentTypeId::attachment()),
        parameters,
        content: data.to_vec(),
    };

    serde_ipld_dagcbor::to_vec(&encoded).map_err(|e| CryptoError::Serialization(e.to_string()))
}

/// Parse envelope bytes back into an attachment
pub fn decode(bytes: &[u8]) -> Result<Attachment> {
    let mut encoded: EncodedContent = serde_ipld_dagcbor::from_slice(bytes)
        .map_err(|e| CryptoError::MalformedEnvelope(e.to_string()))?;

    match &encoded.content_type {
        None => {
            return Err(CryptoError::MalformedEnvelope(
                "no content type in envelope".to_string(),
            ))
        }
        Some(ct) if !ct.is_attachment() => {
            return Err(CryptoError::MalformedEnvelope(format!(
                "unsupported content type {}",
                ct
            )))
        }
        Some(_) => {}
    }

    let mut take = |name: &str| {
        encoded.parameters.remove(name).ok_or_else(|| {
            CryptoError::MalformedEnvelope(format!("missing parameter '{}'", name))
        })
    };
    let filename = take(PARAM_FILENAME)?;
    let mime_type = take(PARAM_MIME_TYPE)?;

    Ok(Attachment {
        filename,
        mime_type,
        data: encoded.content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_roundtrip() {
        let bytes = encode("notes.txt", "text/plain", b"hello").unwrap();
        let attachment = decode(&bytes).unwrap();

        assert_eq!(attachment.filename, "notes.txt");
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.data, b"hello");
    }

    #[test]
    fn test_empty_payload() {
        let bytes = encode("empty.bin", "application/octet-stream", &[]).unwrap();
        assert!(decode(&bytes).unwrap().data.is_empty());
    }

    #[test]
    fn test_encoding_is_reproducible() {
        let a = encode("a.png", "image/png", &[1, 2, 3]).unwrap();
        let b = encode("a.png", "image/png", &[1, 2, 3]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result = decode(&[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(result, Err(CryptoError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_missing_type_tag_is_malformed() {
        let encoded = EncodedContent {
            content_type: None,
            parameters: BTreeMap::new(),
            content: b"data".to_vec(),
        };
        let bytes = serde_ipld_dagcbor::to_vec(&encoded).unwrap();

        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("no content type"));
    }

    #[test]
    fn test_foreign_type_tag_is_malformed() {
        let encoded = EncodedContent {
            content_type: Some(ContentTypeId {
                authority_id: "example.org".to_string(),
                type_id: "text".to_string(),
                version_major: 1,
                version_minor: 0,
            }),
            parameters: BTreeMap::new(),
            content: b"data".to_vec(),
        };
        let bytes = serde_ipld_dagcbor::to_vec(&encoded).unwrap();

        assert!(matches!(decode(&bytes), Err(CryptoError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_missing_filename_is_malformed() {
        let mut parameters = BTreeMap::new();
        parameters.insert(PARAM_MIME_TYPE.to_string(), "text/plain".to_string());
        let encoded = EncodedContent {
            content_type: Some(ContentTypeId::attachment()),
            parameters,
            content: Vec::new(),
        };
        let bytes = serde_ipld_dagcbor::to_vec(&encoded).unwrap();

        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("filename"));
    }

    #[test]
    fn test_content_type_display() {
        assert_eq!(
            ContentTypeId::attachment().to_string(),
            "sealdrop.dev/attachment:1.0"
        );
    }
}
