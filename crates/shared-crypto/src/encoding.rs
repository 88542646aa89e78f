//! # Checksummed Key Encoding
//!
//! Text form used for private key material stored on peer records:
//! `hex(payload || checksum)`, where `checksum` is the first four bytes of
//! SHA-256(SHA-256(payload)).
//!
//! Decoding rejects any text whose checksum does not match, so a truncated or
//! mistyped key never reaches a signer.

use crate::CryptoError;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of the trailing checksum in bytes.
pub const CHECKSUM_LEN: usize = 4;

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&second[..CHECKSUM_LEN]);
    out
}

/// Encode `payload` with a trailing checksum.
pub fn encode_with_checksum(payload: &[u8]) -> String {
    let mut buf = Zeroizing::new(Vec::with_capacity(payload.len() + CHECKSUM_LEN));
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&checksum(payload));
    hex::encode(buf.as_slice())
}

/// Decode a checksummed text, returning the payload.
///
/// # Errors
///
/// - `InvalidEncoding` if the text is not hex or is too short to hold a checksum
/// - `ChecksumMismatch` if the checksum does not match the payload
pub fn decode_with_checksum(text: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let raw = Zeroizing::new(
        hex::decode(text.trim()).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?,
    );

    if raw.len() <= CHECKSUM_LEN {
        return Err(CryptoError::InvalidEncoding(format!(
            "expected more than {CHECKSUM_LEN} bytes, got {}",
            raw.len()
        )));
    }

    let (payload, check) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum(payload).as_slice() != check {
        return Err(CryptoError::ChecksumMismatch);
    }

    Ok(Zeroizing::new(payload.to_vec()))
}
