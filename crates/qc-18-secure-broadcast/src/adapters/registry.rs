//! # In-Memory Peer Registry
//!
//! Registry adapter keyed by `(ip, unique_id)`. Holds the identity records,
//! the whitelist flag (stored on each record), and the numeric public keys of
//! seed-ranked peers.

use crate::domain::PeerRecord;
use crate::ports::PeerRegistry;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type PeerKey = (String, String);

fn key(peer_ip: &str, peer_unique_id: &str) -> PeerKey {
    (peer_ip.to_string(), peer_unique_id.to_string())
}

/// In-memory peer registry.
#[derive(Default)]
pub struct InMemoryPeerRegistry {
    peers: RwLock<HashMap<PeerKey, Arc<PeerRecord>>>,
    seed_ranks: RwLock<HashMap<PeerKey, String>>,
}

impl InMemoryPeerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a peer record.
    pub fn insert(&self, record: PeerRecord) -> Arc<PeerRecord> {
        let endpoint = record.endpoint();
        let key = key(&endpoint.ip, &endpoint.unique_id);
        let record = Arc::new(record);
        self.peers.write().insert(key, record.clone());
        record
    }

    /// Remove a peer. Handles already held by in-flight calls stay valid.
    pub fn remove(&self, peer_ip: &str, peer_unique_id: &str) -> Option<Arc<PeerRecord>> {
        let key = key(peer_ip, peer_unique_id);
        self.seed_ranks.write().remove(&key);
        self.peers.write().remove(&key)
    }

    /// Set the whitelist flag. Returns `false` if the peer is unknown.
    pub fn set_whitelisted(&self, peer_ip: &str, peer_unique_id: &str, whitelisted: bool) -> bool {
        match self.peers.read().get(&key(peer_ip, peer_unique_id)) {
            Some(record) => {
                record.set_whitelisted(whitelisted);
                true
            }
            None => false,
        }
    }

    /// Grant a seed rank with its numeric public key (hex).
    pub fn grant_seed_rank(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
        numeric_public_key: impl Into<String>,
    ) {
        self.seed_ranks
            .write()
            .insert(key(peer_ip, peer_unique_id), numeric_public_key.into());
    }

    /// Revoke a seed rank.
    pub fn revoke_seed_rank(&self, peer_ip: &str, peer_unique_id: &str) {
        self.seed_ranks.write().remove(&key(peer_ip, peer_unique_id));
    }

    /// Number of known peers.
    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}

#[async_trait]
impl PeerRegistry for InMemoryPeerRegistry {
    async fn get_peer_record(
        &self,
        peer_ip: &str,
        peer_unique_id: &str,
    ) -> Option<Arc<PeerRecord>> {
        self.peers.read().get(&key(peer_ip, peer_unique_id)).cloned()
    }

    async fn contains_peer(&self, peer_ip: &str, peer_unique_id: &str) -> bool {
        self.peers.read().contains_key(&key(peer_ip, peer_unique_id))
    }

    async fn is_whitelisted(&self, peer_ip: &str, peer_unique_id: &str) -> bool {
        self.peers
            .read()
            .get(&key(peer_ip, peer_unique_id))
            .is_some_and(|record| record.is_whitelisted())
    }

    async fn has_seed_rank(&self, peer_ip: &str, peer_unique_id: &str) -> Option<String> {
        if !self.contains_peer(peer_ip, peer_unique_id).await {
            return None;
        }
        self.seed_ranks.read().get(&key(peer_ip, peer_unique_id)).cloned()
    }
}
