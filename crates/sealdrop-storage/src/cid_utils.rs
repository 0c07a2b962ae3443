//! CID (Content Identifier) utilities

use cid::Cid;
use multihash_codetable::{Code, MultihashDigest};

/// Multicodec code for raw binary data
pub const RAW_CODEC: u64 = 0x55;

/// Create a CIDv1 (raw codec, SHA2-256 multihash) for the given bytes
pub fn create_cid(data: &[u8]) -> Cid {
    Cid::new_v1(RAW_CODEC, Code::Sha2_256.digest(data))
}

/// Parse a CID from a string (v0 `Qm...` or v1 multibase)
pub fn parse_cid(s: &str) -> Result<Cid, crate::StorageError> {
    s.parse()
        .map_err(|e: cid::Error| crate::StorageError::Deserialization(format!("invalid CID '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cid_consistency() {
        assert_eq!(create_cid(b"test data"), create_cid(b"test data"));
        assert_ne!(create_cid(b"data1"), create_cid(b"data2"));
    }

    #[test]
    fn test_cid_string_roundtrip() {
        let cid = create_cid(b"test");
        assert_eq!(parse_cid(&cid.to_string()).unwrap(), cid);
    }

    #[test]
    fn test_parse_cid_v0() {
        let cid = parse_cid("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();
        assert_eq!(cid.version(), cid::Version::V0);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_cid("not-a-cid").is_err());
    }
}
