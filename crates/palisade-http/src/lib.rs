//! # Palisade HTTP
//!
//! The narrow HTTP surface the trust core consumes: an authenticated
//! client for the central portal and an unauthenticated JSON POST helper
//! for peer delivery. Every request carries a bounded timeout so a
//! stalled peer or portal cannot hang a poll tick.

mod client;
mod error;

pub use client::{peer_client, post_json, PortalClient, DEFAULT_TIMEOUT};
pub use error::HttpError;
