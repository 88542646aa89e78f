//! # Outbound Ports
//!
//! Traits for the collaborators the broadcast flow depends on: the peer
//! registry, the raw packet transport, and the negotiated session.

use crate::domain::{
    PacketEnvelope, PacketResponseType, PeerEndpoint, PeerRecord, SessionError, TransportError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Peer registry - outbound port.
///
/// Lookups tolerate a peer disappearing between calls: a vanished peer simply
/// yields `None` / `false`.
#[async_trait]
pub trait PeerRegistry: Send + Sync {
    /// Resolve the identity record of a peer.
    async fn get_peer_record(&self, peer_ip: &str, peer_unique_id: &str)
        -> Option<Arc<PeerRecord>>;

    /// Whether the peer is known.
    async fn contains_peer(&self, peer_ip: &str, peer_unique_id: &str) -> bool;

    /// Whether the peer has been promoted to the whitelist.
    async fn is_whitelisted(&self, peer_ip: &str, peer_unique_id: &str) -> bool;

    /// Numeric public key of the peer's seed rank, if it holds one.
    async fn has_seed_rank(&self, peer_ip: &str, peer_unique_id: &str) -> Option<String>;
}

/// Packet transport - outbound port.
#[async_trait]
pub trait PacketTransport: Send + Sync {
    /// Send `envelope` to `endpoint` and wait for the reply.
    ///
    /// `expected` is a hint for correlating replies; the caller still checks
    /// the tag of whatever comes back. `Ok(None)` means no reply arrived.
    async fn send_and_await_reply(
        &self,
        envelope: PacketEnvelope,
        endpoint: &PeerEndpoint,
        expected: PacketResponseType,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Option<PacketEnvelope>, TransportError>;
}

/// Negotiated stream cipher - outbound port.
#[async_trait]
pub trait SessionCipher: Send + Sync {
    /// Encrypt packet content.
    async fn encrypt(
        &self,
        plaintext: &[u8],
        cancellation: &CancellationToken,
    ) -> Result<Vec<u8>, SessionError>;

    /// Decrypt packet content.
    async fn decrypt(
        &self,
        sealed: &[u8],
        cancellation: &CancellationToken,
    ) -> Result<Vec<u8>, SessionError>;
}

/// Cached session signer - outbound port.
#[async_trait]
pub trait SessionSigner: Send + Sync {
    /// Sign a hex packet hash. Returns the base64 DER signature.
    async fn sign(
        &self,
        packet_hash: &str,
        cancellation: &CancellationToken,
    ) -> Result<String, SessionError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

enum MockReply {
    Reply(PacketEnvelope),
    Fail(TransportError),
    Silent,
}

/// Mock transport that answers every packet the same way.
pub struct MockPeerTransport {
    reply: MockReply,
    sent: Mutex<Vec<PacketEnvelope>>,
}

impl MockPeerTransport {
    /// Answer every packet with `reply`.
    pub fn replying(reply: PacketEnvelope) -> Self {
        Self::with(MockReply::Reply(reply))
    }

    /// Fail every send with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self::with(MockReply::Fail(error))
    }

    /// Accept every packet but never answer.
    pub fn silent() -> Self {
        Self::with(MockReply::Silent)
    }

    fn with(reply: MockReply) -> Self {
        Self {
            reply,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Packets handed to the transport so far.
    pub fn sent_packets(&self) -> Vec<PacketEnvelope> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl PacketTransport for MockPeerTransport {
    async fn send_and_await_reply(
        &self,
        envelope: PacketEnvelope,
        _endpoint: &PeerEndpoint,
        _expected: PacketResponseType,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Option<PacketEnvelope>, TransportError> {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(TransportError::Cancelled);
        }

        self.sent.lock().push(envelope);

        match &self.reply {
            MockReply::Reply(reply) => Ok(Some(reply.clone())),
            MockReply::Fail(error) => Err(error.clone()),
            MockReply::Silent => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PacketRequestType;

    const CONFIRMATION: PacketResponseType = PacketResponseType::SendKeepAliveConfirmation;

    fn endpoint() -> PeerEndpoint {
        PeerEndpoint::new("10.0.0.2", 2400, "peer-b")
    }

    fn request() -> PacketEnvelope {
        PacketEnvelope::new(PacketRequestType::AskKeepAlive, "{}")
    }

    #[tokio::test]
    async fn test_mock_records_sent_packets() {
        let reply = PacketEnvelope::new(CONFIRMATION, "{}");
        let transport = MockPeerTransport::replying(reply.clone());

        let got = transport
            .send_and_await_reply(request(), &endpoint(), CONFIRMATION, None)
            .await
            .unwrap();

        assert_eq!(got, Some(reply));
        assert_eq!(transport.sent_packets().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_failing_and_silent() {
        let failing = MockPeerTransport::failing(TransportError::Timeout);
        let result = failing
            .send_and_await_reply(request(), &endpoint(), CONFIRMATION, None)
            .await;
        assert_eq!(result, Err(TransportError::Timeout));

        let silent = MockPeerTransport::silent();
        let result = silent
            .send_and_await_reply(request(), &endpoint(), CONFIRMATION, None)
            .await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_mock_observes_cancellation() {
        let transport = MockPeerTransport::silent();
        let token = CancellationToken::new();
        token.cancel();

        let result = transport
            .send_and_await_reply(request(), &endpoint(), CONFIRMATION, Some(&token))
            .await;

        assert_eq!(result, Err(TransportError::Cancelled));
        assert!(transport.sent_packets().is_empty());
    }
}
