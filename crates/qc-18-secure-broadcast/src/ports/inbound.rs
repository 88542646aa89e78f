//! # Inbound Ports
//!
//! API exposed to the rest of the node.

use crate::domain::{PacketRequestType, PacketResponseType, SovereignVerdict};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;

/// Secure broadcast API - inbound port.
#[async_trait]
pub trait SecureBroadcastApi: Send + Sync {
    /// Send a typed request to a peer and return its typed reply.
    ///
    /// Returns `None` on any failure: unknown peer, build failure, transport
    /// failure, wrong reply tag, bad signature, undecryptable or
    /// undeserializable content, or cancellation.
    ///
    /// Passing `None` for `cancellation` forces the static cipher and the raw
    /// signer.
    async fn send_broadcast_packet<Req, Resp>(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
        request_type: PacketRequestType,
        payload: &Req,
        expected_response: PacketResponseType,
        cancellation: Option<&CancellationToken>,
    ) -> Option<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned + Send;

    /// Check the numeric proof a seed-ranked peer attached to `payload`.
    async fn verify_sovereign<P>(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
        payload: &P,
        numeric_hash: &str,
        numeric_signature: &str,
    ) -> SovereignVerdict
    where
        P: Serialize + Sync;
}
