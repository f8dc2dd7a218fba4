//! Error types for canonical encoding

use thiserror::Error;

/// Errors raised while canonicalizing or hashing a value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    /// Floats have no single textual form across languages and platforms,
    /// so they are banned from signed regions. Encode them as strings.
    #[error("floats cannot be canonicalized; encode fractional values as strings")]
    FloatNotAllowed,

    #[error("value cannot be represented as JSON: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CanonicalError {
    fn from(err: serde_json::Error) -> Self {
        CanonicalError::Serialization(err.to_string())
    }
}
