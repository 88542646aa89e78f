//! # Secure Broadcast Configuration
//!
//! Settings for the secure broadcast service.
//!
//! # Config File Format
//!
//! ```toml
//! peer_unique_id = "node-7f3a"
//! enable_sovereign_peer_vote = true
//! paranoid_signature_check = false
//! max_packet_content_size = 8388608
//! ```
//!
//! Missing keys take their default value.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default inbound content bound (8 MiB of base64 text).
pub const DEFAULT_MAX_PACKET_CONTENT_SIZE: usize = 8 * 1024 * 1024;

/// Secure broadcast settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastSettings {
    /// This node's unique id, carried in every envelope it sends.
    pub peer_unique_id: String,

    /// Accept numeric proofs from seed-ranked peers.
    pub enable_sovereign_peer_vote: bool,

    /// Verify every signature, even from whitelisted peers.
    pub paranoid_signature_check: bool,

    /// Largest inbound `packet_content` accepted before decoding.
    pub max_packet_content_size: usize,
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            peer_unique_id: String::new(),
            enable_sovereign_peer_vote: false,
            paranoid_signature_check: false,
            max_packet_content_size: DEFAULT_MAX_PACKET_CONTENT_SIZE,
        }
    }
}

impl BroadcastSettings {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            peer_unique_id: "peer-test".to_string(),
            enable_sovereign_peer_vote: true,
            paranoid_signature_check: false,
            max_packet_content_size: 64 * 1024,
        }
    }

    /// Parse settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Invalid` if the values fail validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_packet_content_size == 0 {
            return Err(ConfigError::Invalid("max_packet_content_size must be positive"));
        }
        Ok(())
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}
