//! # Ports Layer
//!
//! Hexagonal architecture ports:
//! - `inbound`: API this subsystem exposes
//! - `outbound`: collaborators this subsystem drives

pub mod inbound;
pub mod outbound;

pub use inbound::SecureBroadcastApi;
pub use outbound::{MockPeerTransport, PacketTransport, PeerRegistry, SessionCipher, SessionSigner};
