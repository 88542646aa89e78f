//! # Peer Identity Record
//!
//! One record per known remote peer. The registry owns it; the broadcast flow
//! borrows a shared handle for one call.
//!
//! The record carries this node's internal key pair as presented to that
//! peer. The private half stays inside the record: it is not `Serialize`, and
//! `Debug` prints a placeholder instead.

use crate::ports::{SessionCipher, SessionSigner};
use shared_crypto::{Secp256k1KeyPair, Secp256k1PublicKey, StaticPacketKey};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use zeroize::Zeroizing;

/// Network address and unique id of a peer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PeerEndpoint {
    /// Peer address
    pub ip: String,
    /// Peer port
    pub port: u16,
    /// Peer unique id
    pub unique_id: String,
}

impl PeerEndpoint {
    /// Create a new endpoint.
    pub fn new(ip: impl Into<String>, port: u16, unique_id: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port,
            unique_id: unique_id.into(),
        }
    }
}

impl fmt::Display for PeerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.ip, self.port, self.unique_id)
    }
}

/// Everything this node knows about one remote peer.
pub struct PeerRecord {
    endpoint: PeerEndpoint,
    /// This node's internal public key (hex) as presented to the peer
    pub peer_intern_public_key: String,
    peer_intern_private_key: Zeroizing<String>,
    /// The remote peer's public key (hex), used to check its signatures
    pub peer_client_public_key: String,
    /// Static fallback key and IV
    pub static_key: StaticPacketKey,
    signature_watermark: AtomicU64,
    whitelisted: AtomicBool,
    session_cipher: Option<Arc<dyn SessionCipher>>,
    session_signer: Option<Arc<dyn SessionSigner>>,
}

impl PeerRecord {
    /// Create a record from text-encoded keys.
    ///
    /// `intern_private_key` is the checksummed text form of the private key.
    pub fn new(
        endpoint: PeerEndpoint,
        intern_public_key: impl Into<String>,
        intern_private_key: impl Into<String>,
        client_public_key: impl Into<String>,
        static_key: StaticPacketKey,
    ) -> Self {
        Self {
            endpoint,
            peer_intern_public_key: intern_public_key.into(),
            peer_intern_private_key: Zeroizing::new(intern_private_key.into()),
            peer_client_public_key: client_public_key.into(),
            static_key,
            signature_watermark: AtomicU64::new(0),
            whitelisted: AtomicBool::new(false),
            session_cipher: None,
            session_signer: None,
        }
    }

    /// Create a record from this node's key pair and the peer's public key.
    pub fn from_keypair(
        endpoint: PeerEndpoint,
        intern: &Secp256k1KeyPair,
        client_public_key: &Secp256k1PublicKey,
        static_key: StaticPacketKey,
    ) -> Self {
        Self::new(
            endpoint,
            intern.public_key().to_hex(),
            intern.to_checksummed(),
            client_public_key.to_hex(),
            static_key,
        )
    }

    /// Attach a negotiated session acting as both cipher and signer.
    pub fn with_session<S>(mut self, session: Arc<S>) -> Self
    where
        S: SessionCipher + SessionSigner + 'static,
    {
        self.session_cipher = Some(session.clone());
        self.session_signer = Some(session);
        self
    }

    /// Attach a session cipher only.
    pub fn with_session_cipher(mut self, cipher: Arc<dyn SessionCipher>) -> Self {
        self.session_cipher = Some(cipher);
        self
    }

    /// Attach a session signer only.
    pub fn with_session_signer(mut self, signer: Arc<dyn SessionSigner>) -> Self {
        self.session_signer = Some(signer);
        self
    }

    /// Set the initial signature watermark.
    pub fn with_signature_watermark(self, timestamp: u64) -> Self {
        self.signature_watermark.store(timestamp, Ordering::Relaxed);
        self
    }

    /// Peer endpoint.
    pub fn endpoint(&self) -> &PeerEndpoint {
        &self.endpoint
    }

    /// Peer unique id.
    pub fn unique_id(&self) -> &str {
        &self.endpoint.unique_id
    }

    /// Checksummed internal private key. Never log this.
    pub(crate) fn intern_private_key(&self) -> &str {
        &self.peer_intern_private_key
    }

    /// Session cipher, if a session has been negotiated.
    pub fn session_cipher(&self) -> Option<&Arc<dyn SessionCipher>> {
        self.session_cipher.as_ref()
    }

    /// Session signer, if a session has been negotiated.
    pub fn session_signer(&self) -> Option<&Arc<dyn SessionSigner>> {
        self.session_signer.as_ref()
    }

    /// Last packet-signature watermark (unix seconds).
    pub fn signature_watermark(&self) -> u64 {
        self.signature_watermark.load(Ordering::Relaxed)
    }

    /// Move the watermark forward. Older timestamps are ignored.
    pub fn advance_signature_watermark(&self, timestamp: u64) {
        self.signature_watermark.fetch_max(timestamp, Ordering::Relaxed);
    }

    /// Whitelist flag.
    pub fn is_whitelisted(&self) -> bool {
        self.whitelisted.load(Ordering::Acquire)
    }

    /// Set the whitelist flag.
    pub fn set_whitelisted(&self, whitelisted: bool) {
        self.whitelisted.store(whitelisted, Ordering::Release);
    }
}

impl fmt::Debug for PeerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerRecord")
            .field("endpoint", &self.endpoint)
            .field("peer_intern_public_key", &self.peer_intern_public_key)
            .field("peer_intern_private_key", &"<redacted>")
            .field("peer_client_public_key", &self.peer_client_public_key)
            .field("static_key", &self.static_key)
            .field("signature_watermark", &self.signature_watermark())
            .field("whitelisted", &self.is_whitelisted())
            .field("session_cipher", &self.session_cipher.is_some())
            .field("session_signer", &self.session_signer.is_some())
            .finish()
    }
}
