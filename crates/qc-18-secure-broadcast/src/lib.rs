//! # QC-18 Secure Broadcast
//!
//! Signed, encrypted request/response envelopes between peers.
//!
//! **Subsystem ID:** 18
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Send a typed request to a peer and get a typed, authenticated reply back:
//!
//! ```text
//! payload → serialize → encrypt → hash(content ∥ tag) → sign → transport
//!                                                                 │
//! Option<Resp> ← deserialize ← decrypt ← verify ← tag check ← reply
//! ```
//!
//! Every failure collapses to `None`; the cause is only visible in `debug`
//! logs.
//!
//! ## Fallback Chains
//!
//! | Concern | Preferred | Fallback |
//! |---------|-----------|----------|
//! | Signing | Cached session signer | Raw secp256k1 signer from the record |
//! | Encryption | Session XChaCha20-Poly1305 | Static AES-256-GCM key + IV |
//! | Reply signature | Verified | Skipped for whitelisted peers (unless paranoid) |
//!
//! The preferred path is only taken when a cancellation token is supplied.
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-secure-broadcast/
//! ├── domain/          # Packet types, envelope, peer record, codec, sovereign proof
//! ├── strategy/        # Signing, encryption, trust shortcut
//! ├── ports/           # API trait (inbound) + registry/transport/session traits (outbound)
//! ├── application/     # SecureBroadcastService
//! ├── adapters/        # In-memory registry, stream session, loopback transport
//! └── config.rs        # BroadcastSettings
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod strategy;

// Re-exports
pub use adapters::{
    InMemoryPeerRegistry, LoopbackNetwork, LoopbackTransport, PacketHandler, StreamSession,
};
pub use application::SecureBroadcastService;
pub use config::{BroadcastSettings, ConfigError};
pub use domain::{
    BroadcastError, PacketEnvelope, PacketOrder, PacketRequestType, PacketResponseType,
    PeerEndpoint, PeerRecord, SessionError, SovereignProof, SovereignVerdict, TransportError,
};
pub use ports::{
    MockPeerTransport, PacketTransport, PeerRegistry, SecureBroadcastApi, SessionCipher,
    SessionSigner,
};
pub use strategy::{CipherStrategy, SigningStrategy, TrustMode, TrustShortcut};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
