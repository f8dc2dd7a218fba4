//! HTTP transport errors.

use palisade_capability::CapabilityError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response shape from {url}: {reason}")]
    BadResponse { url: String, reason: String },

    #[error("cannot obtain capability token: {0}")]
    Capability(#[from] CapabilityError),
}
