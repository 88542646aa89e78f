//! # SHA-256 Hashing
//!
//! Packet integrity hashes are lowercase hex SHA-256 digests. Both peers must
//! hash the exact same byte sequence, so every helper here is a plain digest
//! over its inputs in the order given.

use crate::CryptoError;
use sha2::{Digest, Sha256};

/// SHA-256 output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hash data and return the lowercase hex digest (64 chars).
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Hash the concatenation of `parts` without allocating the joined buffer.
pub fn sha256_concat_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Decode a hex string into raw bytes.
///
/// # Errors
///
/// Returns `CryptoError::InvalidEncoding` for odd length or non-hex input.
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(text).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}
