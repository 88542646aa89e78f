//! # Secure Broadcast Service
//!
//! Application service driving one request/response exchange with a peer:
//! build → send → await → verify → decrypt → deserialize.
//!
//! Internally every step returns `Result<_, BroadcastError>`. The public API
//! collapses every failure into `None`; the reason only shows up in `debug`
//! logs.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::BroadcastSettings;
use crate::domain::{
    check_numeric_signature, compute_packet_hash, decode_content, deserialize_payload,
    encode_content, serialize_payload, BroadcastError, PacketEnvelope, PacketOrder,
    PacketRequestType, PacketResponseType, PeerRecord, SovereignProof, SovereignVerdict,
    TransportError,
};
use crate::ports::{PacketTransport, PeerRegistry, SecureBroadcastApi};
use crate::strategy::{
    decrypt_packet_content, encrypt_packet_content, sign_packet_hash, verify_packet_signature,
    TrustShortcut,
};

fn ensure_not_cancelled(cancellation: Option<&CancellationToken>) -> Result<(), BroadcastError> {
    if cancellation.is_some_and(CancellationToken::is_cancelled) {
        return Err(BroadcastError::Cancelled);
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Secure Broadcast Service - orchestrates signed, encrypted exchanges.
pub struct SecureBroadcastService<R: PeerRegistry, T: PacketTransport> {
    /// Configuration.
    settings: BroadcastSettings,
    /// Peer registry.
    registry: Arc<R>,
    /// Packet transport.
    transport: Arc<T>,
    /// Trust shortcut evaluator.
    trust: TrustShortcut,
}

impl<R: PeerRegistry, T: PacketTransport> SecureBroadcastService<R, T> {
    /// Create a new service.
    pub fn new(settings: BroadcastSettings, registry: Arc<R>, transport: Arc<T>) -> Self {
        let trust = TrustShortcut::from_settings(&settings);
        Self {
            settings,
            registry,
            transport,
            trust,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &BroadcastSettings {
        &self.settings
    }

    /// Peer registry.
    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Packet transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Internal: resolve a peer record.
    async fn resolve(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
    ) -> Result<Arc<PeerRecord>, BroadcastError> {
        if !self.registry.contains_peer(peer_ip, peer_unique_id).await {
            return Err(BroadcastError::peer_not_found(peer_ip, peer_unique_id));
        }
        self.registry
            .get_peer_record(peer_ip, peer_unique_id)
            .await
            .ok_or_else(|| BroadcastError::peer_not_found(peer_ip, peer_unique_id))
    }

    /// Internal: encrypt, hash and optionally sign an envelope for `record`.
    async fn seal_envelope(
        &self,
        record: &PeerRecord,
        envelope: PacketEnvelope,
        sign: bool,
        cancellation: Option<&CancellationToken>,
    ) -> Result<PacketEnvelope, BroadcastError> {
        let mut envelope = envelope.with_sender(
            self.settings.peer_unique_id.as_str(),
            record.peer_intern_public_key.as_str(),
            record.signature_watermark(),
        );

        let sealed =
            encrypt_packet_content(record, envelope.packet_content.as_bytes(), cancellation)
                .await?;
        envelope.packet_content = encode_content(&sealed);
        envelope.packet_hash = compute_packet_hash(&envelope.packet_content, envelope.packet_order);
        envelope.packet_signature = if sign {
            sign_packet_hash(record, &envelope.packet_hash, cancellation).await?
        } else {
            String::new()
        };

        Ok(envelope)
    }

    /// Internal: check, decrypt and deserialize an inbound envelope.
    async fn verify_inbound<P: DeserializeOwned>(
        &self,
        record: &PeerRecord,
        envelope: &PacketEnvelope,
        cancellation: Option<&CancellationToken>,
    ) -> Result<P, BroadcastError> {
        if envelope.packet_content.len() > self.settings.max_packet_content_size {
            return Err(BroadcastError::Decode("content exceeds size bound"));
        }

        let expected_hash = compute_packet_hash(&envelope.packet_content, envelope.packet_order);
        if expected_hash != envelope.packet_hash {
            return Err(BroadcastError::Verification("packet hash mismatch"));
        }

        let endpoint = record.endpoint();
        if !self
            .trust
            .is_shortcut_trusted(self.registry.as_ref(), &endpoint.ip, &endpoint.unique_id)
            .await
        {
            if !verify_packet_signature(
                &envelope.packet_hash,
                &envelope.packet_signature,
                &record.peer_client_public_key,
            ) {
                return Err(BroadcastError::Verification("packet signature rejected"));
            }
            record.advance_signature_watermark(unix_now());
        }

        let sealed = decode_content(&envelope.packet_content)?;
        let plaintext = decrypt_packet_content(record, &sealed, cancellation).await?;

        deserialize_payload(&plaintext)
            .ok_or(BroadcastError::Decode("payload could not be deserialized"))
    }

    /// Build a sealed envelope for a known peer.
    ///
    /// `envelope.packet_content` must hold the plaintext serialization. The
    /// sender identity token is filled in from the peer record. The packet is
    /// signed when the peer is whitelisted or `force_signature` is set.
    pub async fn build_signed_envelope(
        &self,
        envelope: PacketEnvelope,
        peer_ip: &str,
        peer_unique_id: &str,
        force_signature: bool,
        cancellation: Option<&CancellationToken>,
    ) -> Result<PacketEnvelope, BroadcastError> {
        ensure_not_cancelled(cancellation)?;
        let record = self.resolve(peer_ip, peer_unique_id).await?;
        let sign = force_signature || self.registry.is_whitelisted(peer_ip, peer_unique_id).await;

        self.seal_envelope(&record, envelope, sign, cancellation).await
    }

    /// Send a typed request and return the typed reply, or the reason it failed.
    pub async fn try_send_broadcast_packet<Req, Resp>(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
        request_type: PacketRequestType,
        payload: &Req,
        expected_response: PacketResponseType,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Resp, BroadcastError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let content = String::from_utf8(serialize_payload(payload)?)
            .map_err(|e| BroadcastError::BuildFailed(e.to_string()))?;
        ensure_not_cancelled(cancellation)?;

        let record = self.resolve(peer_ip, peer_unique_id).await?;
        let envelope = self
            .seal_envelope(&record, PacketEnvelope::new(request_type, content), true, cancellation)
            .await?;
        let endpoint = record.endpoint().clone();
        drop(record);

        let send = self
            .transport
            .send_and_await_reply(envelope, &endpoint, expected_response, cancellation);

        let outcome = match cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(BroadcastError::Cancelled),
                outcome = send => outcome,
            },
            None => send.await,
        };
        let reply = outcome?.ok_or(BroadcastError::Transport(TransportError::ConnectionClosed))?;

        if !reply.is_response(expected_response) {
            return Err(BroadcastError::UnexpectedResponse {
                expected: expected_response.to_string(),
                actual: reply.packet_order.to_string(),
            });
        }

        // The peer may have been dropped or updated while we waited.
        let record = self.resolve(peer_ip, peer_unique_id).await?;
        self.verify_inbound(&record, &reply, cancellation).await
    }

    /// Open an inbound request from `source_ip`, or return why it was rejected.
    ///
    /// The sender is looked up by `source_ip` and the envelope's sender id.
    pub async fn try_open_request<P: DeserializeOwned>(
        &self,
        source_ip: &str,
        envelope: &PacketEnvelope,
        cancellation: Option<&CancellationToken>,
    ) -> Result<(PacketRequestType, P), BroadcastError> {
        ensure_not_cancelled(cancellation)?;
        let request_type = envelope.packet_order.request().ok_or_else(|| {
            BroadcastError::UnexpectedResponse {
                expected: "request".to_string(),
                actual: envelope.packet_order.to_string(),
            }
        })?;

        let record = self.resolve(source_ip, &envelope.sender_unique_id).await?;
        let payload = self.verify_inbound(&record, envelope, cancellation).await?;
        Ok((request_type, payload))
    }

    /// Open an inbound request. `None` on any failure.
    pub async fn open_request<P: DeserializeOwned>(
        &self,
        source_ip: &str,
        envelope: &PacketEnvelope,
        cancellation: Option<&CancellationToken>,
    ) -> Option<(PacketRequestType, P)> {
        match self.try_open_request(source_ip, envelope, cancellation).await {
            Ok(opened) => Some(opened),
            Err(e) if e.is_suspicious() => {
                warn!(
                    "[qc-18] Rejected {} from {}/{}: {}",
                    envelope.packet_order, source_ip, envelope.sender_unique_id, e
                );
                None
            }
            Err(e) => {
                debug!(
                    "[qc-18] Dropped {} from {}/{}: {}",
                    envelope.packet_order, source_ip, envelope.sender_unique_id, e
                );
                None
            }
        }
    }

    /// Build a signed reply envelope for a known peer, or return why it failed.
    pub async fn try_build_reply<P: Serialize + ?Sized>(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
        response_type: PacketResponseType,
        payload: &P,
        cancellation: Option<&CancellationToken>,
    ) -> Result<PacketEnvelope, BroadcastError> {
        let content = String::from_utf8(serialize_payload(payload)?)
            .map_err(|e| BroadcastError::BuildFailed(e.to_string()))?;
        self.build_signed_envelope(
            PacketEnvelope::new(PacketOrder::Response(response_type), content),
            peer_ip,
            peer_unique_id,
            true,
            cancellation,
        )
        .await
    }

    /// Build a signed reply envelope for a known peer. `None` on any failure.
    pub async fn build_reply<P: Serialize + ?Sized>(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
        response_type: PacketResponseType,
        payload: &P,
        cancellation: Option<&CancellationToken>,
    ) -> Option<PacketEnvelope> {
        match self
            .try_build_reply(peer_ip, peer_unique_id, response_type, payload, cancellation)
            .await
        {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                debug!(
                    "[qc-18] Failed to build {} for {}/{}: {}",
                    response_type, peer_ip, peer_unique_id, e
                );
                None
            }
        }
    }
}

#[async_trait]
impl<R, T> SecureBroadcastApi for SecureBroadcastService<R, T>
where
    R: PeerRegistry + 'static,
    T: PacketTransport + 'static,
{
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
        Resp: DeserializeOwned + Send,
    {
        match self
            .try_send_broadcast_packet(
                peer_ip,
                peer_unique_id,
                request_type,
                payload,
                expected_response,
                cancellation,
            )
            .await
        {
            Ok(response) => Some(response),
            Err(e) if e.is_suspicious() => {
                warn!(
                    "[qc-18] {} to {}/{} got a suspicious reply: {}",
                    request_type, peer_ip, peer_unique_id, e
                );
                None
            }
            Err(e) => {
                debug!(
                    "[qc-18] {} to {}/{} failed: {}",
                    request_type, peer_ip, peer_unique_id, e
                );
                None
            }
        }
    }

    async fn verify_sovereign<P>(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
        payload: &P,
        numeric_hash: &str,
        numeric_signature: &str,
    ) -> SovereignVerdict
    where
        P: Serialize + Sync,
    {
        let proof = SovereignProof {
            numeric_hash: numeric_hash.to_string(),
            numeric_signature: numeric_signature.to_string(),
        };
        if !self.settings.enable_sovereign_peer_vote || proof.is_incomplete() {
            return SovereignVerdict::rejected();
        }

        let Some(numeric_public_key) = self.registry.has_seed_rank(peer_ip, peer_unique_id).await
        else {
            return SovereignVerdict::rejected();
        };

        let valid = match serialize_payload(payload) {
            Ok(bytes) => check_numeric_signature(
                &bytes,
                &proof.numeric_hash,
                &proof.numeric_signature,
                &numeric_public_key,
            ),
            Err(_) => false,
        };

        if !valid {
            debug!(
                "[qc-18] Sovereign proof from {}/{} rejected",
                peer_ip, peer_unique_id
            );
        }

        SovereignVerdict {
            valid,
            numeric_public_key,
        }
    }
}
