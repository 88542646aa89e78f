//! # Domain Layer
//!
//! Packet types, the peer identity record, the envelope codec and the
//! sovereign numeric proof.

pub mod codec;
pub mod errors;
pub mod identity;
pub mod packet;
pub mod sovereign;

pub use codec::{
    compute_packet_hash, decode_content, deserialize_payload, encode_content, serialize_payload,
};
pub use errors::{BroadcastError, SessionError, TransportError};
pub use identity::{PeerEndpoint, PeerRecord};
pub use packet::{PacketEnvelope, PacketOrder, PacketRequestType, PacketResponseType};
pub use sovereign::{check_numeric_signature, SovereignProof, SovereignVerdict};
