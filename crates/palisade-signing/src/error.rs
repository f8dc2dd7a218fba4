//! Error types for Palisade signing.

use palisade_canonical::CanonicalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    #[error("key file {path}: {reason}")]
    KeyFile { path: String, reason: String },

    #[error("payload cannot be signed: {0}")]
    Canonical(#[from] CanonicalError),
}
