//! # ECDSA Signatures (secp256k1)
//!
//! Signatures used on peer packets and sovereign numeric proofs.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization (EIP-2)
//! - Constant-time operations
//!
//! ## Encodings
//!
//! - Public keys: hex of the 33-byte compressed SEC1 point
//! - Private keys: checksummed text (see [`crate::encoding`])
//! - Signatures: base64 of the ASN.1 DER form
//!
//! Messages are hashed with SHA-256 before signing (`SHA256withECDSA`).

use crate::encoding::{decode_with_checksum, encode_with_checksum};
use crate::CryptoError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use zeroize::Zeroize;

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey([u8; 33]);

impl Secp256k1PublicKey {
    /// Create from compressed bytes (33 bytes, starting with 0x02 or 0x03).
    pub fn from_bytes(bytes: [u8; 33]) -> Result<Self, CryptoError> {
        VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Parse the hex text form.
    pub fn from_hex(text: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(text.trim()).map_err(|_| CryptoError::InvalidPublicKey)?;
        let bytes: [u8; 33] = raw
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        Self::from_bytes(bytes)
    }

    /// Hex text form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Verify a signature over `message`.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &Secp256k1Signature,
    ) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig =
            Signature::from_der(&signature.0).map_err(|_| CryptoError::InvalidSignatureFormat)?;

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// ECDSA signature in DER form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Secp256k1Signature(Vec<u8>);

impl Secp256k1Signature {
    /// Wrap DER bytes. The encoding is checked at verification time.
    pub fn from_der(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse the base64 text form.
    pub fn from_base64(text: &str) -> Result<Self, CryptoError> {
        STANDARD
            .decode(text.trim())
            .map(Self)
            .map_err(|_| CryptoError::InvalidSignatureFormat)
    }

    /// Base64 text form.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Get DER bytes.
    pub fn as_der(&self) -> &[u8] {
        &self.0
    }
}

/// secp256k1 ECDSA keypair.
///
/// The inner `SigningKey` zeroizes its scalar on drop.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Decode the checksummed text form of a private key.
    pub fn from_checksummed(text: &str) -> Result<Self, CryptoError> {
        let secret = decode_with_checksum(text).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Self::from_bytes(&secret)
    }

    /// Checksummed text form of the private key.
    ///
    /// Only for handing the key to a record or wallet; never log it.
    pub fn to_checksummed(&self) -> String {
        let mut secret: [u8; 32] = self.signing_key.to_bytes().into();
        let text = encode_with_checksum(&secret);
        secret.zeroize();
        text
    }

    /// Get public key (compressed, 33 bytes).
    pub fn public_key(&self) -> Secp256k1PublicKey {
        let sec1_bytes = self.signing_key.verifying_key().to_sec1_bytes();
        // SEC1 compressed: 0x02/0x03 prefix followed by the 32-byte x-coordinate
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(&sec1_bytes[..33]);
        Secp256k1PublicKey(bytes)
    }

    /// Sign a message (SHA-256, deterministic RFC 6979).
    pub fn sign(&self, message: &[u8]) -> Secp256k1Signature {
        let sig: Signature = self.signing_key.sign(message);
        Secp256k1Signature(sig.to_der().as_bytes().to_vec())
    }
}
