//! # Test Fixtures
//!
//! Two peers on a loopback network:
//!
//! | Peer | Address | Unique id |
//! |------|---------|-----------|
//! | A (asker) | 10.0.0.1 | peer-a |
//! | B (responder) | 10.0.0.2 | peer-b |
//!
//! Both records share the same static key and (optionally) the same session
//! key. B answers `ASK_BLOCK_DATA` with the doubled value.

use async_trait::async_trait;
use qc_18_secure_broadcast::strategy::raw_sign;
use qc_18_secure_broadcast::{
    BroadcastSettings, InMemoryPeerRegistry, LoopbackNetwork, LoopbackTransport, PacketEnvelope,
    PacketHandler, PacketRequestType, PacketResponseType, PeerEndpoint, PeerRecord,
    SecureBroadcastService, StreamSession,
};
use serde::{Deserialize, Serialize};
use shared_crypto::{Secp256k1KeyPair, SecretKey, StaticPacketKey};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Address of peer A.
pub const IP_A: &str = "10.0.0.1";
/// Unique id of peer A.
pub const ID_A: &str = "peer-a";
/// Address of peer B.
pub const IP_B: &str = "10.0.0.2";
/// Unique id of peer B.
pub const ID_B: &str = "peer-b";

const PORT: u16 = 2400;

/// A node on the loopback network.
pub type Node = SecureBroadcastService<InMemoryPeerRegistry, LoopbackTransport>;

/// Payload exchanged in the scenarios.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValuePayload {
    /// Carried value
    pub value: u64,
}

/// Install a test subscriber once. Honours `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// How B answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Responder {
    /// Double the value, reply `SEND_BLOCK_DATA`.
    Honest,
    /// Double the value, but tag the reply with another response type.
    WrongTag(PacketResponseType),
    /// Double the value, then replace the signature with one from a stranger key.
    ForgedSignature,
}

struct DoublingResponder {
    node: Arc<Node>,
    behaviour: Responder,
}

#[async_trait]
impl PacketHandler for DoublingResponder {
    async fn handle_packet(
        &self,
        source_ip: &str,
        envelope: PacketEnvelope,
        cancellation: Option<&CancellationToken>,
    ) -> Option<PacketEnvelope> {
        let (request_type, payload): (PacketRequestType, ValuePayload) =
            self.node.open_request(source_ip, &envelope, cancellation).await?;
        if request_type != PacketRequestType::AskBlockData {
            return None;
        }

        let response_type = match self.behaviour {
            Responder::WrongTag(tag) => tag,
            _ => PacketResponseType::SendBlockData,
        };
        let doubled = ValuePayload {
            value: payload.value * 2,
        };

        let mut reply = self
            .node
            .build_reply(
                source_ip,
                &envelope.sender_unique_id,
                response_type,
                &doubled,
                cancellation,
            )
            .await?;

        if self.behaviour == Responder::ForgedSignature {
            let stranger = Secp256k1KeyPair::generate();
            reply.packet_signature = raw_sign(&stranger.to_checksummed(), &reply.packet_hash).ok()?;
        }
        Some(reply)
    }
}

/// Fixture options.
#[derive(Clone, Debug)]
pub struct NetworkOptions {
    /// Attach a negotiated session to both records.
    pub sessions: bool,
    /// How B answers.
    pub responder: Responder,
    /// Settings of A (`peer_unique_id` is overwritten).
    pub settings_a: BroadcastSettings,
    /// Settings of B (`peer_unique_id` is overwritten).
    pub settings_b: BroadcastSettings,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            sessions: false,
            responder: Responder::Honest,
            settings_a: BroadcastSettings::for_testing(),
            settings_b: BroadcastSettings::for_testing(),
        }
    }
}

/// Two peers wired to each other.
pub struct TwoPeerNetwork {
    /// Shared routing table
    pub loopback: Arc<LoopbackNetwork>,
    /// Peer A
    pub a: Arc<Node>,
    /// Peer B
    pub b: Arc<Node>,
    /// Session of A's record for B, if any
    pub session_a: Option<Arc<StreamSession>>,
    /// Session of B's record for A, if any
    pub session_b: Option<Arc<StreamSession>>,
}

fn node(
    loopback: &Arc<LoopbackNetwork>,
    local_ip: &str,
    mut settings: BroadcastSettings,
    local_id: &str,
    record: PeerRecord,
) -> Arc<Node> {
    settings.peer_unique_id = local_id.to_string();
    let registry = InMemoryPeerRegistry::new();
    registry.insert(record);
    Arc::new(SecureBroadcastService::new(
        settings,
        Arc::new(registry),
        Arc::new(loopback.transport(local_ip)),
    ))
}

impl TwoPeerNetwork {
    /// Build the network with default options.
    pub fn new() -> Self {
        Self::with_options(NetworkOptions::default())
    }

    /// Build the network.
    pub fn with_options(options: NetworkOptions) -> Self {
        init_tracing();

        let key_a = Secp256k1KeyPair::generate();
        let key_b = Secp256k1KeyPair::generate();
        let static_key = StaticPacketKey::generate();
        let session_key = SecretKey::generate();

        let mut record_for_b = PeerRecord::from_keypair(
            PeerEndpoint::new(IP_B, PORT, ID_B),
            &key_a,
            &key_b.public_key(),
            static_key.clone(),
        );
        let mut record_for_a = PeerRecord::from_keypair(
            PeerEndpoint::new(IP_A, PORT, ID_A),
            &key_b,
            &key_a.public_key(),
            static_key,
        );

        let (session_a, session_b) = if options.sessions {
            let session_a = Arc::new(StreamSession::new(session_key.clone(), key_a));
            let session_b = Arc::new(StreamSession::new(session_key, key_b));
            record_for_b = record_for_b.with_session(session_a.clone());
            record_for_a = record_for_a.with_session(session_b.clone());
            (Some(session_a), Some(session_b))
        } else {
            (None, None)
        };

        let loopback = LoopbackNetwork::new();
        let a = node(&loopback, IP_A, options.settings_a, ID_A, record_for_b);
        let b = node(&loopback, IP_B, options.settings_b, ID_B, record_for_a);

        loopback.register(
            IP_B,
            ID_B,
            Arc::new(DoublingResponder {
                node: b.clone(),
                behaviour: options.responder,
            }),
        );

        Self {
            loopback,
            a,
            b,
            session_a,
            session_b,
        }
    }
}

impl Default for TwoPeerNetwork {
    fn default() -> Self {
        Self::new()
    }
}
