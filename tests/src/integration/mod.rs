//! # Integration Tests
//!
//! Two nodes talking over an in-process loopback network.

pub mod fixtures;

#[cfg(test)]
mod broadcast_flows;
