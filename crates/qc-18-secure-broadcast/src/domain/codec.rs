//! # Envelope Codec
//!
//! Payload serialization, content encoding and the packet integrity hash.

use super::errors::BroadcastError;
use super::packet::PacketOrder;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Serialize};
use shared_crypto::sha256_concat_hex;

/// Serialize a payload to its JSON bytes.
///
/// Struct fields keep declaration order, so the output is deterministic.
pub fn serialize_payload<T: Serialize + ?Sized>(payload: &T) -> Result<Vec<u8>, BroadcastError> {
    serde_json::to_vec(payload).map_err(|e| BroadcastError::BuildFailed(e.to_string()))
}

/// Deserialize a payload. Malformed input and a JSON `null` both yield `None`.
pub fn deserialize_payload<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Hex SHA-256 over `content ∥ order`.
pub fn compute_packet_hash(content: &str, order: PacketOrder) -> String {
    sha256_concat_hex(&[content.as_bytes(), order.as_str().as_bytes()])
}

/// Base64 text form of sealed content.
pub fn encode_content(sealed: &[u8]) -> String {
    STANDARD.encode(sealed)
}

/// Decode base64 packet content.
pub fn decode_content(content: &str) -> Result<Vec<u8>, BroadcastError> {
    STANDARD
        .decode(content)
        .map_err(|_| BroadcastError::Decode("content is not base64"))
}
