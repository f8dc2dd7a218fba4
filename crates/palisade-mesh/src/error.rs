//! Mesh relay errors.

use palisade_canonical::CanonicalError;
use palisade_http::HttpError;
use palisade_signing::SigningError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("payload rejected before signing: {0}")]
    Canonical(#[from] CanonicalError),

    #[error("envelope signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("local state unreadable: {0}")]
    Io(#[from] std::io::Error),
}
