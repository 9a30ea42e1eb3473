//! SHA-256 checksums for APKs listed in the table of contents.

use sha2::{Digest, Sha256};

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Verify SHA256 checksum of data.
///
/// Accepts both `sha256:<hex>` and bare `<hex>` forms, case-insensitively.
pub fn verify_sha256(data: &[u8], expected: &str) -> bool {
    let expected_hex = expected.strip_prefix("sha256:").unwrap_or(expected);
    compute_sha256(data).eq_ignore_ascii_case(expected_hex)
}
