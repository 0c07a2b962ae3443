//! Attachment encryption
//!
//! `encrypt_attachment` wraps the payload in an envelope, encrypts it under a
//! fresh HKDF-derived key and digests the ciphertext. `decrypt_attachment`
//! reverses the process given the same key material.

use crate::{
    envelope::{self, Attachment},
    hashing::ContentDigest,
    keys::{AttachmentSecret, KeyMaterial, Salt},
    symmetric::{Aead, Nonce},
    Result,
};

/// Output of [`encrypt_attachment`]
#[derive(Clone)]
pub struct EncryptedAttachment {
    /// Ciphertext with the authentication tag appended
    pub payload: Vec<u8>,
    /// SHA-256 over `payload`
    pub digest: ContentDigest,
    /// Key material needed to decrypt `payload`
    pub material: KeyMaterial,
    /// Original file name
    pub filename: String,
    /// MIME type of the plaintext
    pub mime_type: String,
}

impl EncryptedAttachment {
    /// Ciphertext length in bytes
    pub fn content_length(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn secret(&self) -> &AttachmentSecret {
        &self.material.secret
    }

    pub fn salt(&self) -> &Salt {
        &self.material.salt
    }

    pub fn nonce(&self) -> &Nonce {
        &self.material.nonce
    }
}

impl std::fmt::Debug for EncryptedAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedAttachment")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("content_length", &self.payload.len())
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

/// Encrypt `data` under freshly generated key material
pub fn encrypt_attachment(data: &[u8], filename: &str, mime_type: &str) -> Result<EncryptedAttachment> {
    encrypt_attachment_with(KeyMaterial::generate(), data, filename, mime_type)
}

/// Encrypt `data` under caller-supplied key material.
///
/// The material must never have been used for another attachment.
pub fn encrypt_attachment_with(
    material: KeyMaterial,
    data: &[u8],
    filename: &str,
    mime_type: &str,
) -> Result<EncryptedAttachment> {
    let plaintext = envelope::encode(filename, mime_type, data)?;

    let key = material.derive_key()?;
    let payload = Aead::new(&key)?.encrypt(&material.nonce, &plaintext)?;
    let digest = ContentDigest::of(&payload);

    Ok(EncryptedAttachment {
        payload,
        digest,
        material,
        filename: filename.to_string(),
        mime_type: mime_type.to_string(),
    })
}

/// Decrypt a payload and decode the envelope inside it.
///
/// No digest check happens here; callers decide whether to verify first.
pub fn decrypt_attachment(payload: &[u8], material: &KeyMaterial) -> Result<Attachment> {
    let key = material.derive_key()?;
    let plaintext = Aead::new(&key)?.decrypt(&material.nonce, payload)?;
    envelope::decode(&plaintext)
}
