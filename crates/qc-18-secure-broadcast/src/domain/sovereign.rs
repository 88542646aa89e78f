//! # Sovereign Numeric Proof
//!
//! Seed-ranked peers attach a numeric proof to sovereign vote payloads: the
//! hex SHA-256 of the serialized payload, signed with the peer's numeric key.
//! A receiver checks it against the numeric public key the registry stores
//! for that seed rank.

use super::codec::serialize_payload;
use super::errors::BroadcastError;
use serde::{Deserialize, Serialize};
use shared_crypto::{
    hex_to_bytes, sha256_hex, Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature,
};

/// Numeric hash and signature attached by the sender.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SovereignProof {
    /// Hex SHA-256 of the serialized payload
    pub numeric_hash: String,
    /// Base64 signature over the numeric hash
    pub numeric_signature: String,
}

impl SovereignProof {
    /// Produce a proof for `payload` with the sender's numeric key pair.
    pub fn produce<P: Serialize>(
        payload: &P,
        numeric_key: &Secp256k1KeyPair,
    ) -> Result<Self, BroadcastError> {
        let numeric_hash = sha256_hex(&serialize_payload(payload)?);
        let digest = hex_to_bytes(&numeric_hash)?;
        let numeric_signature = numeric_key.sign(&digest).to_base64();

        Ok(Self {
            numeric_hash,
            numeric_signature,
        })
    }

    /// Whether either field is missing.
    pub fn is_incomplete(&self) -> bool {
        self.numeric_hash.is_empty() || self.numeric_signature.is_empty()
    }
}

/// Outcome of a sovereign check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SovereignVerdict {
    /// Whether the proof verified
    pub valid: bool,
    /// Numeric public key resolved from the seed rank (empty if none)
    pub numeric_public_key: String,
}

impl SovereignVerdict {
    /// Precondition failed: no key resolved.
    pub fn rejected() -> Self {
        Self {
            valid: false,
            numeric_public_key: String::new(),
        }
    }
}

/// Check `numeric_hash` and `numeric_signature` for a serialized payload.
pub fn check_numeric_signature(
    serialized_payload: &[u8],
    numeric_hash: &str,
    numeric_signature: &str,
    numeric_public_key: &str,
) -> bool {
    if !sha256_hex(serialized_payload).eq_ignore_ascii_case(numeric_hash) {
        return false;
    }

    let Ok(digest) = hex_to_bytes(numeric_hash) else {
        return false;
    };
    let Ok(public_key) = Secp256k1PublicKey::from_hex(numeric_public_key) else {
        return false;
    };
    let Ok(signature) = Secp256k1Signature::from_base64(numeric_signature) else {
        return false;
    };

    public_key.verify(&digest, &signature).is_ok()
}
