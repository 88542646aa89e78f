//! # Strategies
//!
//! Fallback chains selected per call: signing, encryption, and the trust
//! shortcut.

pub mod encryption;
pub mod signing;
pub mod trust;

pub use encryption::{decrypt_packet_content, encrypt_packet_content, CipherStrategy};
pub use signing::{raw_sign, sign_packet_hash, verify_packet_signature, SigningStrategy};
pub use trust::{TrustMode, TrustShortcut};
