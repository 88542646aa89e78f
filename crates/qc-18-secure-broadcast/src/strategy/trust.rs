//! # Trust Shortcut
//!
//! Whitelisted peers have already been proven trustworthy, so their reply
//! signatures are not re-checked. Paranoid mode turns the shortcut off.

use crate::config::BroadcastSettings;
use crate::ports::PeerRegistry;

/// Whether the shortcut is honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrustMode {
    /// Skip signature checks for whitelisted peers.
    Shortcut,
    /// Always check signatures.
    Paranoid,
}

/// Trust shortcut evaluator.
#[derive(Clone, Copy, Debug)]
pub struct TrustShortcut {
    mode: TrustMode,
}

impl TrustShortcut {
    /// Create with an explicit mode.
    pub fn new(mode: TrustMode) -> Self {
        Self { mode }
    }

    /// Create from settings.
    pub fn from_settings(settings: &BroadcastSettings) -> Self {
        if settings.paranoid_signature_check {
            Self::new(TrustMode::Paranoid)
        } else {
            Self::new(TrustMode::Shortcut)
        }
    }

    /// Whether signature verification may be skipped for this peer.
    ///
    /// Unknown peers are never trusted.
    pub async fn is_shortcut_trusted<R>(
        &self,
        registry: &R,
        peer_ip: &str,
        peer_unique_id: &str,
    ) -> bool
    where
        R: PeerRegistry + ?Sized,
    {
        match self.mode {
            TrustMode::Paranoid => false,
            TrustMode::Shortcut => registry.is_whitelisted(peer_ip, peer_unique_id).await,
        }
    }
}
