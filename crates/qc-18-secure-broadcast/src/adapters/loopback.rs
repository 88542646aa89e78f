//! # Loopback Transport
//!
//! In-process transport: every node registers a [`PacketHandler`] on a shared
//! [`LoopbackNetwork`], and packets are dispatched directly to the handler of
//! the target endpoint. Used to run several nodes inside one process.

use crate::domain::{PacketEnvelope, PacketResponseType, PeerEndpoint, TransportError};
use crate::ports::PacketTransport;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Receiving side of a node.
#[async_trait]
pub trait PacketHandler: Send + Sync {
    /// Handle a packet from `source_ip` and optionally reply.
    async fn handle_packet(
        &self,
        source_ip: &str,
        envelope: PacketEnvelope,
        cancellation: Option<&CancellationToken>,
    ) -> Option<PacketEnvelope>;
}

/// Shared routing table of an in-process network.
#[derive(Default)]
pub struct LoopbackNetwork {
    handlers: RwLock<HashMap<(String, String), Arc<dyn PacketHandler>>>,
}

impl LoopbackNetwork {
    /// Create an empty network.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach a node's handler at `ip` under `unique_id`.
    pub fn register(&self, ip: &str, unique_id: &str, handler: Arc<dyn PacketHandler>) {
        self.handlers
            .write()
            .insert((ip.to_string(), unique_id.to_string()), handler);
    }

    /// Detach a node.
    pub fn unregister(&self, ip: &str, unique_id: &str) {
        self.handlers
            .write()
            .remove(&(ip.to_string(), unique_id.to_string()));
    }

    /// Transport for the node at `local_ip`.
    pub fn transport(self: &Arc<Self>, local_ip: &str) -> LoopbackTransport {
        LoopbackTransport {
            local_ip: local_ip.to_string(),
            network: Arc::clone(self),
        }
    }

    fn route(&self, endpoint: &PeerEndpoint) -> Option<Arc<dyn PacketHandler>> {
        self.handlers
            .read()
            .get(&(endpoint.ip.clone(), endpoint.unique_id.clone()))
            .cloned()
    }
}

/// Transport of one node on a [`LoopbackNetwork`].
pub struct LoopbackTransport {
    local_ip: String,
    network: Arc<LoopbackNetwork>,
}

impl LoopbackTransport {
    /// Address this node sends from.
    pub fn local_ip(&self) -> &str {
        &self.local_ip
    }
}

#[async_trait]
impl PacketTransport for LoopbackTransport {
    async fn send_and_await_reply(
        &self,
        envelope: PacketEnvelope,
        endpoint: &PeerEndpoint,
        expected: PacketResponseType,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Option<PacketEnvelope>, TransportError> {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(TransportError::Cancelled);
        }

        let handler = self
            .network
            .route(endpoint)
            .ok_or_else(|| TransportError::Unreachable(endpoint.to_string()))?;

        trace!(
            "[qc-18] Loopback {} -> {} ({}, awaiting {})",
            self.local_ip,
            endpoint,
            envelope.packet_order,
            expected
        );

        Ok(handler
            .handle_packet(&self.local_ip, envelope, cancellation)
            .await)
    }
}
