//! # Quantum-Chain Test Suite
//!
//! Cross-peer scenarios for the secure broadcast subsystem.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs         # Two-peer loopback network
//!     └── broadcast_flows.rs  # Request/response scenarios between peers
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//!
//! # With diagnostics
//! RUST_LOG=qc_18_secure_broadcast=debug cargo test -p qc-tests -- --nocapture
//! ```

pub mod integration;
