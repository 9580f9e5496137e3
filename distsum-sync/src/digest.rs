//! Content digests for release artifacts.
//!
//! Whole-file reads: artifacts are bounded packaging outputs, so a pass holds
//! at most one artifact in memory at a time.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// Lowercase hex SHA-256 of `bytes`.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Lowercase hex SHA-256 of the complete contents of the file at `path`.
///
/// An unreadable file is an error: a missing artifact must abort that
/// artifact's processing, never silently produce no digest.
pub fn hash_file(path: &Path) -> Result<String, SyncError> {
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    Ok(hash_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn known_digest_for_known_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("artifact.tar.xz");
        std::fs::write(&path, "AAAA").unwrap();
        assert_eq!(
            hash_file(&path).unwrap(),
            "63c1dd951ffedf6f7fd968ad4efa39b8ed584f162f46e715114ee184f8de9201"
        );
    }

    #[test]
    fn empty_file_hashes_to_empty_digest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.zip");
        std::fs::write(&path, "").unwrap();
        assert_eq!(
            hash_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn identical_bytes_yield_identical_digests() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.tar.xz");
        let b = tmp.path().join("b.tar.xz");
        std::fs::write(&a, b"same bytes").unwrap();
        std::fs::write(&b, b"same bytes").unwrap();
        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
        assert_eq!(hash_file(&a).unwrap(), hash_file(&a).unwrap());
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = hash_bytes(b"anything");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = hash_file(&tmp.path().join("nope.tar.xz")).unwrap_err();
        assert!(matches!(err, SyncError::Io { .. }), "got: {err}");
    }
}
