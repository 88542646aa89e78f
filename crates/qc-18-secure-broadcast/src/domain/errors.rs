//! # Domain Errors
//!
//! Internal failure taxonomy for the secure broadcast flow.
//!
//! Every variant collapses to `None` at the public orchestrator boundary, so
//! callers cannot tell which step rejected a packet. The variants exist for
//! `tracing` diagnostics and for unit tests of the individual steps.

use shared_crypto::CryptoError;
use thiserror::Error;

/// Secure broadcast error types.
///
/// Messages never contain key material, packet content, or signatures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// Peer is unknown to the registry (or vanished mid-call).
    #[error("Peer not found: {peer_ip}/{peer_unique_id}")]
    PeerNotFound {
        /// Peer address
        peer_ip: String,
        /// Peer unique id
        peer_unique_id: String,
    },

    /// Envelope could not be built (serialization, encryption or signing).
    #[error("Envelope build failed: {0}")]
    BuildFailed(String),

    /// Transport reported failure or no reply arrived.
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Reply carried a different packet type than the one awaited.
    #[error("Unexpected response type: expected {expected}, got {actual}")]
    UnexpectedResponse {
        /// Awaited tag
        expected: String,
        /// Received tag
        actual: String,
    },

    /// Integrity hash or signature did not verify.
    #[error("Packet verification failed: {0}")]
    Verification(&'static str),

    /// Content could not be decrypted or deserialized.
    #[error("Packet decode failed: {0}")]
    Decode(&'static str),

    /// Cancellation context fired before the flow completed.
    #[error("Operation cancelled")]
    Cancelled,
}

impl BroadcastError {
    /// Creates a `PeerNotFound` error.
    pub fn peer_not_found(peer_ip: &str, peer_unique_id: &str) -> Self {
        Self::PeerNotFound {
            peer_ip: peer_ip.to_string(),
            peer_unique_id: peer_unique_id.to_string(),
        }
    }

    /// Returns `true` if this failure might indicate a spoofing attempt.
    #[must_use]
    pub fn is_suspicious(&self) -> bool {
        matches!(self, Self::Verification(_) | Self::UnexpectedResponse { .. })
    }
}

impl From<CryptoError> for BroadcastError {
    fn from(err: CryptoError) -> Self {
        Self::BuildFailed(err.to_string())
    }
}

/// Errors reported by a packet transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Target peer is not reachable.
    #[error("Peer unreachable: {0}")]
    Unreachable(String),

    /// No reply arrived before the transport gave up.
    #[error("Timed out waiting for reply")]
    Timeout,

    /// Connection was closed mid-exchange.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Transport observed the cancellation context.
    #[error("Transport cancelled")]
    Cancelled,
}

/// Errors reported by a negotiated session (cipher or signer).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session has been torn down or was never completed.
    #[error("Session unavailable")]
    Unavailable,

    /// Cryptographic failure inside the session.
    #[error("Session crypto failure: {0}")]
    Crypto(#[from] CryptoError),

    /// Session observed the cancellation context.
    #[error("Session operation cancelled")]
    Cancelled,
}
