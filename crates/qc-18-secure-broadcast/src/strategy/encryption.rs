//! # Encryption Strategy
//!
//! Content goes through the negotiated session cipher when the record has one
//! and the caller supplied a cancellation context, and through the static
//! AES-256-GCM key otherwise or when the session cipher fails. Both schemes
//! are AEAD, so trying the wrong one fails instead of producing garbage.

use crate::domain::{BroadcastError, PeerRecord, SessionError};
use crate::ports::SessionCipher;
use shared_crypto::{decrypt_static, encrypt_static};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cipher chosen for one packet.
pub enum CipherStrategy<'a> {
    /// Negotiated stream cipher.
    Session {
        /// Session cipher
        cipher: &'a dyn SessionCipher,
        /// Caller's cancellation context
        cancellation: &'a CancellationToken,
    },
    /// Static key and IV from the record.
    Static,
}

impl<'a> CipherStrategy<'a> {
    /// Pick the cipher for `record`.
    pub fn select(record: &'a PeerRecord, cancellation: Option<&'a CancellationToken>) -> Self {
        match (record.session_cipher(), cancellation) {
            (Some(cipher), Some(cancellation)) => Self::Session {
                cipher: cipher.as_ref(),
                cancellation,
            },
            _ => Self::Static,
        }
    }
}

/// Encrypt packet content for `record`.
pub async fn encrypt_packet_content(
    record: &PeerRecord,
    plaintext: &[u8],
    cancellation: Option<&CancellationToken>,
) -> Result<Vec<u8>, BroadcastError> {
    if let CipherStrategy::Session {
        cipher,
        cancellation,
    } = CipherStrategy::select(record, cancellation)
    {
        match cipher.encrypt(plaintext, cancellation).await {
            Ok(sealed) => return Ok(sealed),
            Err(SessionError::Cancelled) => return Err(BroadcastError::Cancelled),
            Err(e) => debug!(
                "[qc-18] Session encryption failed for {}, using static key: {}",
                record.unique_id(),
                e
            ),
        }
    }

    encrypt_static(&record.static_key, plaintext).map_err(BroadcastError::from)
}

/// Decrypt packet content from `record`.
pub async fn decrypt_packet_content(
    record: &PeerRecord,
    sealed: &[u8],
    cancellation: Option<&CancellationToken>,
) -> Result<Vec<u8>, BroadcastError> {
    if let CipherStrategy::Session {
        cipher,
        cancellation,
    } = CipherStrategy::select(record, cancellation)
    {
        match cipher.decrypt(sealed, cancellation).await {
            Ok(plaintext) => return Ok(plaintext),
            Err(SessionError::Cancelled) => return Err(BroadcastError::Cancelled),
            Err(e) => debug!(
                "[qc-18] Session decryption failed for {}, trying static key: {}",
                record.unique_id(),
                e
            ),
        }
    }

    decrypt_static(&record.static_key, sealed)
        .map_err(|_| BroadcastError::Decode("content could not be decrypted"))
}
