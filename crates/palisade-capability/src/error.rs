//! Error types for capability tokens.

use palisade_canonical::CanonicalError;
use palisade_signing::SigningError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("token is expired (exp {exp}, now {now})")]
    Expired { exp: i64, now: i64 },

    #[error("token audience {found:?} does not match verifier {expected:?}")]
    AudienceMismatch { expected: String, found: String },

    #[error("token signature does not verify")]
    InvalidSignature,

    #[error("token is not decodable: {0}")]
    Malformed(String),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Canonical(#[from] CanonicalError),
}
