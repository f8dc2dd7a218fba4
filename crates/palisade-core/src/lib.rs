//! # Palisade Core
//!
//! Shared data model and configuration for the Palisade attestation mesh:
//! mesh peers and envelopes, anchor records, and the environment-driven
//! configuration consumed by the daemons.

pub mod config;
mod error;
pub mod logging;
mod types;

pub use config::{CapabilityConfig, NodeConfig, WatcherConfig};
pub use error::ConfigError;
pub use types::*;
