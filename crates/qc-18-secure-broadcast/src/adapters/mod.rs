//! # Adapters
//!
//! In-process implementations of the outbound ports.

pub mod loopback;
pub mod registry;
pub mod session;

pub use loopback::{LoopbackNetwork, LoopbackTransport, PacketHandler};
pub use registry::InMemoryPeerRegistry;
pub use session::StreamSession;
