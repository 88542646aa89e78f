//! Error type shared by every primitive in this crate.

use thiserror::Error;

/// Cryptographic operation errors.
///
/// Messages never carry key material.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (authentication tag mismatch or truncated input)
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Text encoding could not be decoded
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Checksum of a checksummed encoding does not match its payload
    #[error("Checksum mismatch")]
    ChecksumMismatch,
}
