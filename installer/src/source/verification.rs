//! Archive integrity verification.
//!
//! The digest of the downloaded archive must equal the digest recorded in
//! the formula before anything is unpacked. There is no policy knob and no
//! fallback: a mismatch aborts the install.

use crate::error::{InstallerError, Result};
use sha2::{Digest, Sha256};
use shellgpt_formula::Sha256Digest;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// Reads the file at `path` in chunks.
///
/// # Errors
///
/// Returns [`InstallerError::Io`] if the file cannot be read.
pub fn compute_sha256(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify the archive at `path` against the expected digest.
///
/// `url` only labels the error.
///
/// # Errors
///
/// Returns [`InstallerError::ChecksumMismatch`] when the digests differ and
/// [`InstallerError::Io`] when the archive cannot be read.
pub fn verify_archive(path: &Path, expected: &Sha256Digest, url: &str) -> Result<()> {
    let actual = compute_sha256(path)?;
    if actual != expected.as_str() {
        return Err(InstallerError::ChecksumMismatch {
            url: url.to_owned(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty input.
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn computes_digest_of_empty_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty");
        fs::write(&path, b"").expect("write");

        assert_eq!(compute_sha256(&path).expect("digest"), EMPTY_SHA256);
    }

    #[test]
    fn digest_spans_multiple_chunks() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("large");
        let content = vec![7u8; 8192 * 3 + 11];
        fs::write(&path, &content).expect("write");

        let expected = format!("{:x}", Sha256::digest(&content));
        assert_eq!(compute_sha256(&path).expect("digest"), expected);
    }

    #[test]
    fn verify_accepts_matching_digest() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty");
        fs::write(&path, b"").expect("write");
        let expected = Sha256Digest::try_from(EMPTY_SHA256).expect("valid digest");

        verify_archive(&path, &expected, "file:///empty").expect("digests match");
    }

    #[test]
    fn verify_rejects_mismatched_digest() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("archive");
        fs::write(&path, b"tampered").expect("write");
        let expected = Sha256Digest::try_from(EMPTY_SHA256).expect("valid digest");

        let err = verify_archive(&path, &expected, "file:///archive").expect_err("mismatch");

        match err {
            InstallerError::ChecksumMismatch {
                expected: recorded,
                actual,
                ..
            } => {
                assert_eq!(recorded, EMPTY_SHA256);
                assert_ne!(actual, EMPTY_SHA256);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
