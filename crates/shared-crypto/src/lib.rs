//! # Shared Crypto - Peer Packet Primitives
//!
//! **Status:** Phase 1 Implementation
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305, AES-256-GCM | Session cipher, static fallback |
//! | `hashing` | SHA-256 | Packet integrity hashes |
//! | `ecdsa` | secp256k1 | Packet and numeric signatures |
//! | `encoding` | hex + double SHA-256 checksum | Private key text form |
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit nonce, constant-time, side-channel immune
//! - **AES-GCM**: authenticated, so a wrong key never yields plaintext
//! - **secp256k1**: RFC 6979 deterministic, low-S normalization (EIP-2)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod encoding;
pub mod errors;
pub mod hashing;
pub mod symmetric;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use encoding::{decode_with_checksum, encode_with_checksum};
pub use errors::CryptoError;
pub use hashing::{hex_to_bytes, sha256, sha256_concat_hex, sha256_hex, Hash};
pub use symmetric::{
    decrypt_session, decrypt_static, encrypt_session, encrypt_static, SecretKey, StaticPacketKey,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
