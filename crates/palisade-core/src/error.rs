//! Configuration errors

use thiserror::Error;

/// Startup-time configuration failures.
///
/// These are the only errors in Palisade that should terminate a process:
/// a daemon without an identity or a parsable peer set must not start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}
