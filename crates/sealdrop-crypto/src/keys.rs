//! Per-attachment key material
//!
//! Every attachment gets its own random secret and salt. The AES key is never
//! stored or transmitted; it is re-derived on both sides with HKDF-SHA256:
//! - IKM: the 32-byte attachment secret
//! - salt: the 32-byte attachment salt
//! - info: empty

use crate::{symmetric::Nonce, CryptoError, Result};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a symmetric key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// Size of the attachment secret in bytes
pub const SECRET_SIZE: usize = 32;

/// Size of the HKDF salt in bytes
pub const SALT_SIZE: usize = 32;

/// Size of a nonce in bytes (96 bits for AES-GCM)
pub const NONCE_SIZE: usize = 12;

/// HKDF info parameter shared by encryptor and decryptor
const HKDF_INFO: &[u8] = &[];

fn fill_random<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::RngCore::fill_bytes(&mut OsRng, &mut bytes);
    bytes
}

fn copy_exact<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N]> {
    if bytes.len() != N {
        return Err(CryptoError::InvalidKey(format!(
            "{} must be {} bytes, got {}",
            what,
            N,
            bytes.len()
        )));
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(bytes);
    Ok(arr)
}

/// Input keying material for a single attachment
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AttachmentSecret {
    bytes: [u8; SECRET_SIZE],
}

impl AttachmentSecret {
    /// Generate a new random secret
    pub fn generate() -> Self {
        Self {
            bytes: fill_random(),
        }
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            bytes: copy_exact(bytes, "attachment secret")?,
        })
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8; SECRET_SIZE] {
        &self.bytes
    }

    /// Encode as base64
    pub fn to_base64(&self) -> String {
        base64_serde::encode(&self.bytes)
    }

    /// Decode from base64
    pub fn from_base64(s: &str) -> Result<Self> {
        Self::from_bytes(&base64_serde::decode(s)?)
    }
}

impl std::fmt::Debug for AttachmentSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AttachmentSecret(<redacted>)")
    }
}

/// HKDF salt for a single attachment
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generate a new random salt
    pub fn generate() -> Self {
        Self {
            bytes: fill_random(),
        }
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            bytes: copy_exact(bytes, "salt")?,
        })
    }

    /// Get the salt bytes
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }

    /// Encode as base64
    pub fn to_base64(&self) -> String {
        base64_serde::encode(&self.bytes)
    }

    /// Decode from base64
    pub fn from_base64(s: &str) -> Result<Self> {
        Self::from_bytes(&base64_serde::decode(s)?)
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Salt({})", self.to_base64())
    }
}

/// A symmetric key derived from an attachment secret and salt
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Derive the AES-256 key with HKDF-SHA256
    pub fn derive(secret: &AttachmentSecret, salt: &Salt) -> Result<Self> {
        let hk = Hkdf::<Sha256>::new(Some(salt.as_bytes()), secret.as_bytes());
        let mut key = [0u8; KEY_SIZE];
        hk.expand(HKDF_INFO, &mut key)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        Ok(Self { key })
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

/// Everything needed to repeat the decryption of one attachment
#[derive(Clone, Debug)]
pub struct KeyMaterial {
    pub secret: AttachmentSecret,
    pub salt: Salt,
    pub nonce: Nonce,
}

impl KeyMaterial {
    /// Generate fresh secret, salt and nonce from the OS random source
    pub fn generate() -> Self {
        Self {
            secret: AttachmentSecret::generate(),
            salt: Salt::generate(),
            nonce: Nonce::generate(),
        }
    }

    /// Derive the symmetric key for this material
    pub fn derive_key(&self) -> Result<DerivedKey> {
        DerivedKey::derive(&self.secret, &self.salt)
    }
}

macro_rules! base64_string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_str(&self.to_base64())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(d)?;
                Self::from_base64(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

base64_string_serde!(AttachmentSecret);
base64_string_serde!(Salt);
base64_string_serde!(Nonce);

pub(crate) mod base64_serde {
    use base64::Engine;

    pub fn encode(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    pub fn decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(s)
    }
}
