//! # Stream Session
//!
//! Negotiated session attached to a peer record: XChaCha20-Poly1305 keyed by
//! the session key, and a cached secp256k1 signer built once from the
//! record's internal key pair.
//!
//! A closed session reports `SessionError::Unavailable`, which sends the
//! caller down the static / raw path.

use crate::domain::SessionError;
use crate::ports::{SessionCipher, SessionSigner};
use async_trait::async_trait;
use shared_crypto::{
    decrypt_session, encrypt_session, hex_to_bytes, CryptoError, Secp256k1KeyPair, SecretKey,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Negotiated stream session.
pub struct StreamSession {
    key: SecretKey,
    signer: Secp256k1KeyPair,
    closed: AtomicBool,
}

impl StreamSession {
    /// Create a session from its key and the signer to cache.
    pub fn new(key: SecretKey, signer: Secp256k1KeyPair) -> Self {
        Self {
            key,
            signer,
            closed: AtomicBool::new(false),
        }
    }

    /// Create a session whose signer is decoded from a checksummed private key.
    pub fn from_checksummed(key: SecretKey, private_key: &str) -> Result<Self, CryptoError> {
        Ok(Self::new(key, Secp256k1KeyPair::from_checksummed(private_key)?))
    }

    /// Tear the session down.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Whether the session has been torn down.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn check(&self, cancellation: &CancellationToken) -> Result<(), SessionError> {
        if cancellation.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        if self.is_closed() {
            return Err(SessionError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl SessionCipher for StreamSession {
    async fn encrypt(
        &self,
        plaintext: &[u8],
        cancellation: &CancellationToken,
    ) -> Result<Vec<u8>, SessionError> {
        self.check(cancellation)?;
        Ok(encrypt_session(&self.key, plaintext)?)
    }

    async fn decrypt(
        &self,
        sealed: &[u8],
        cancellation: &CancellationToken,
    ) -> Result<Vec<u8>, SessionError> {
        self.check(cancellation)?;
        Ok(decrypt_session(&self.key, sealed)?)
    }
}

#[async_trait]
impl SessionSigner for StreamSession {
    async fn sign(
        &self,
        packet_hash: &str,
        cancellation: &CancellationToken,
    ) -> Result<String, SessionError> {
        self.check(cancellation)?;
        let digest = hex_to_bytes(packet_hash)?;
        Ok(self.signer.sign(&digest).to_base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{raw_sign, verify_packet_signature};
    use shared_crypto::sha256_hex;

    #[tokio::test]
    async fn test_cipher_roundtrip() {
        let session = StreamSession::new(SecretKey::generate(), Secp256k1KeyPair::generate());
        let token = CancellationToken::new();

        let sealed = session.encrypt(b"{\"value\":42}", &token).await.unwrap();
        assert_eq!(session.decrypt(&sealed, &token).await.unwrap(), b"{\"value\":42}");
    }

    #[tokio::test]
    async fn test_session_signature_matches_raw_signature() {
        let keypair = Secp256k1KeyPair::generate();
        let private_key = keypair.to_checksummed();
        let session = StreamSession::from_checksummed(SecretKey::generate(), &private_key).unwrap();
        let hash = sha256_hex(b"content");

        let session_signature = session.sign(&hash, &CancellationToken::new()).await.unwrap();
        let raw_signature = raw_sign(&private_key, &hash).unwrap();

        assert_eq!(session_signature, raw_signature);
        assert!(verify_packet_signature(&hash, &session_signature, &keypair.public_key().to_hex()));
    }

    #[tokio::test]
    async fn test_closed_session_unavailable() {
        let session = StreamSession::new(SecretKey::generate(), Secp256k1KeyPair::generate());
        session.close();

        let result = session.encrypt(b"x", &CancellationToken::new()).await;
        assert_eq!(result, Err(SessionError::Unavailable));
    }

    #[tokio::test]
    async fn test_cancelled_token() {
        let session = StreamSession::new(SecretKey::generate(), Secp256k1KeyPair::generate());
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(session.sign(&sha256_hex(b"x"), &token).await, Err(SessionError::Cancelled));
    }

    #[tokio::test]
    async fn test_wrong_session_key_fails() {
        let token = CancellationToken::new();
        let a = StreamSession::new(SecretKey::generate(), Secp256k1KeyPair::generate());
        let b = StreamSession::new(SecretKey::generate(), Secp256k1KeyPair::generate());

        let sealed = a.encrypt(b"secret", &token).await.unwrap();
        assert!(matches!(b.decrypt(&sealed, &token).await, Err(SessionError::Crypto(_))));
    }
}
