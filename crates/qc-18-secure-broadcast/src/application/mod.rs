//! # Application Module
//!
//! Application service orchestrating the domain, strategies and outbound ports.

pub mod service;

pub use service::SecureBroadcastService;
