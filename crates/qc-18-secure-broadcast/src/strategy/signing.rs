//! # Signing Strategy
//!
//! Packet hashes are signed by the record's session signer when one is
//! negotiated and the caller supplied a cancellation context. Otherwise, or
//! when the session signer fails, the raw signer decodes the record's
//! internal private key, signs the hex-decoded hash, and drops its key state
//! before returning.

use crate::domain::{BroadcastError, PeerRecord, SessionError};
use crate::ports::SessionSigner;
use shared_crypto::{
    hex_to_bytes, CryptoError, Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Signer chosen for one packet.
pub enum SigningStrategy<'a> {
    /// Cached session signer.
    Session {
        /// Session signer
        signer: &'a dyn SessionSigner,
        /// Caller's cancellation context
        cancellation: &'a CancellationToken,
    },
    /// Raw secp256k1 signer built from the record's private key.
    Raw,
}

impl<'a> SigningStrategy<'a> {
    /// Pick the signer for `record`.
    pub fn select(record: &'a PeerRecord, cancellation: Option<&'a CancellationToken>) -> Self {
        match (record.session_signer(), cancellation) {
            (Some(signer), Some(cancellation)) => Self::Session {
                signer: signer.as_ref(),
                cancellation,
            },
            _ => Self::Raw,
        }
    }
}

/// Sign `packet_hash` (hex) for `record`. Returns the base64 signature.
pub async fn sign_packet_hash(
    record: &PeerRecord,
    packet_hash: &str,
    cancellation: Option<&CancellationToken>,
) -> Result<String, BroadcastError> {
    if let SigningStrategy::Session {
        signer,
        cancellation,
    } = SigningStrategy::select(record, cancellation)
    {
        match signer.sign(packet_hash, cancellation).await {
            Ok(signature) => return Ok(signature),
            Err(SessionError::Cancelled) => return Err(BroadcastError::Cancelled),
            Err(e) => debug!(
                "[qc-18] Session signer failed for {}, using raw signer: {}",
                record.unique_id(),
                e
            ),
        }
    }

    Ok(raw_sign(record.intern_private_key(), packet_hash)?)
}

/// Sign `packet_hash` (hex) with a checksummed private key.
///
/// The signer consumes exactly `packet_hash.len() / 2` bytes.
pub fn raw_sign(private_key: &str, packet_hash: &str) -> Result<String, CryptoError> {
    let digest = hex_to_bytes(packet_hash)?;
    let signer = Secp256k1KeyPair::from_checksummed(private_key)?;
    let signature = signer.sign(&digest);
    drop(signer);

    Ok(signature.to_base64())
}

/// Verify a base64 signature over `packet_hash` (hex). Malformed input is `false`.
pub fn verify_packet_signature(packet_hash: &str, signature: &str, public_key: &str) -> bool {
    let Ok(digest) = hex_to_bytes(packet_hash) else {
        return false;
    };
    let Ok(public_key) = Secp256k1PublicKey::from_hex(public_key) else {
        return false;
    };
    let Ok(signature) = Secp256k1Signature::from_base64(signature) else {
        return false;
    };

    public_key.verify(&digest, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PeerEndpoint;
    use async_trait::async_trait;
    use shared_crypto::{sha256_hex, StaticPacketKey};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubSigner {
        result: Result<String, SessionError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionSigner for StubSigner {
        async fn sign(&self, _: &str, _: &CancellationToken) -> Result<String, SessionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn record(intern: &Secp256k1KeyPair) -> PeerRecord {
        PeerRecord::from_keypair(
            PeerEndpoint::new("10.0.0.2", 2400, "peer-b"),
            intern,
            &Secp256k1KeyPair::generate().public_key(),
            StaticPacketKey::generate(),
        )
    }

    fn stub(result: Result<String, SessionError>) -> Arc<StubSigner> {
        Arc::new(StubSigner {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_raw_sign_verifies() {
        let keypair = Secp256k1KeyPair::generate();
        let hash = sha256_hex(b"content");

        let signature = raw_sign(&keypair.to_checksummed(), &hash).unwrap();
        assert!(verify_packet_signature(&hash, &signature, &keypair.public_key().to_hex()));
    }

    #[test]
    fn test_raw_sign_rejects_bad_inputs() {
        let keypair = Secp256k1KeyPair::generate();
        assert!(raw_sign("zz", &sha256_hex(b"x")).is_err());
        assert!(raw_sign(&keypair.to_checksummed(), "abc").is_err());
    }

    #[test]
    fn test_verify_malformed_is_false() {
        let keypair = Secp256k1KeyPair::generate();
        let hash = sha256_hex(b"content");
        let signature = raw_sign(&keypair.to_checksummed(), &hash).unwrap();
        let public_key = keypair.public_key().to_hex();

        assert!(!verify_packet_signature("not-hex", &signature, &public_key));
        assert!(!verify_packet_signature(&hash, "@@@", &public_key));
        assert!(!verify_packet_signature(&hash, &signature, "02"));
        assert!(!verify_packet_signature(&sha256_hex(b"other"), &signature, &public_key));
    }

    #[tokio::test]
    async fn test_no_cancellation_forces_raw() {
        let keypair = Secp256k1KeyPair::generate();
        let signer = stub(Ok("session".to_string()));
        let record = record(&keypair).with_session_signer(signer.clone());
        let hash = sha256_hex(b"content");

        assert!(matches!(SigningStrategy::select(&record, None), SigningStrategy::Raw));

        let signature = sign_packet_hash(&record, &hash, None).await.unwrap();
        assert_eq!(signer.calls.load(Ordering::SeqCst), 0);
        assert!(verify_packet_signature(&hash, &signature, &keypair.public_key().to_hex()));
    }

    #[tokio::test]
    async fn test_session_signer_preferred() {
        let signer = stub(Ok("session-signature".to_string()));
        let record = record(&Secp256k1KeyPair::generate()).with_session_signer(signer.clone());
        let token = CancellationToken::new();

        let signature = sign_packet_hash(&record, &sha256_hex(b"x"), Some(&token)).await.unwrap();
        assert_eq!(signature, "session-signature");
        assert_eq!(signer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_failure_falls_back_to_raw() {
        let keypair = Secp256k1KeyPair::generate();
        let record = record(&keypair).with_session_signer(stub(Err(SessionError::Unavailable)));
        let token = CancellationToken::new();
        let hash = sha256_hex(b"content");

        let signature = sign_packet_hash(&record, &hash, Some(&token)).await.unwrap();
        assert!(verify_packet_signature(&hash, &signature, &keypair.public_key().to_hex()));
    }

    #[tokio::test]
    async fn test_session_cancellation_propagates() {
        let record = record(&Secp256k1KeyPair::generate())
            .with_session_signer(stub(Err(SessionError::Cancelled)));
        let token = CancellationToken::new();

        let result = sign_packet_hash(&record, &sha256_hex(b"x"), Some(&token)).await;
        assert_eq!(result, Err(BroadcastError::Cancelled));
    }
}
