//! # Symmetric Encryption
//!
//! Two AEAD constructions back the packet encryption strategies:
//!
//! - **Session**: XChaCha20-Poly1305 keyed by the negotiated session key.
//!   Output is `nonce(24) || ciphertext || tag`.
//! - **Static fallback**: AES-256-GCM keyed by the record's fixed key. The
//!   record's IV is bound as associated data and a fresh 96-bit nonce is drawn
//!   per packet. Output is `nonce(12) || ciphertext || tag`.
//!
//! Both fail with `DecryptionFailed` on a wrong key, a wrong scheme, or any
//! tampering; neither can hand back unauthenticated bytes.

use crate::CryptoError;
use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// XChaCha20 nonce size in bytes.
pub const SESSION_NONCE_SIZE: usize = 24;

/// AES-GCM nonce size in bytes.
pub const STATIC_NONCE_SIZE: usize = 12;

/// Static fallback IV size in bytes.
pub const STATIC_IV_SIZE: usize = 16;

/// Poly1305 / GCM tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Secret key (256-bit).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Static packet encryption key and IV assigned to a peer.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct StaticPacketKey {
    key: SecretKey,
    iv: [u8; STATIC_IV_SIZE],
}

impl StaticPacketKey {
    /// Create from raw parts.
    pub fn from_parts(key: [u8; 32], iv: [u8; STATIC_IV_SIZE]) -> Self {
        Self {
            key: SecretKey::from_bytes(key),
            iv,
        }
    }

    /// Generate a random key and IV.
    pub fn generate() -> Self {
        let mut iv = [0u8; STATIC_IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);
        Self {
            key: SecretKey::generate(),
            iv,
        }
    }

    /// Get the IV.
    pub fn iv(&self) -> &[u8; STATIC_IV_SIZE] {
        &self.iv
    }
}

impl std::fmt::Debug for StaticPacketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticPacketKey(<redacted>)")
    }
}

fn random_nonce<const N: usize>() -> [u8; N] {
    let mut nonce = [0u8; N];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Encrypt with the session cipher (XChaCha20-Poly1305).
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt_session(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = random_nonce::<SESSION_NONCE_SIZE>();

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(SESSION_NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt session cipher output.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if the input is truncated or does
/// not authenticate under `key`.
pub fn decrypt_session(key: &SecretKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < SESSION_NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }

    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let (nonce, ciphertext) = sealed.split_at(SESSION_NONCE_SIZE);

    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// Encrypt with the static fallback key (AES-256-GCM, IV as associated data).
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt_static(key: &StaticPacketKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(key.key.as_bytes().into());
    let nonce = random_nonce::<STATIC_NONCE_SIZE>();

    let ciphertext = cipher
        .encrypt(
            aes_gcm::Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &key.iv,
            },
        )
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(STATIC_NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt static fallback output.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if the input is truncated or does
/// not authenticate under `key`.
pub fn decrypt_static(key: &StaticPacketKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < STATIC_NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new(key.key.as_bytes().into());
    let (nonce, ciphertext) = sealed.split_at(STATIC_NONCE_SIZE);

    cipher
        .decrypt(
            aes_gcm::Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: &key.iv,
            },
        )
        .map_err(|_| CryptoError::DecryptionFailed)
}
