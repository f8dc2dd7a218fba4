//! Anchor persistence errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("anchor record not writable: {0}")]
    Io(#[from] std::io::Error),

    #[error("anchor record not serializable: {0}")]
    Json(#[from] serde_json::Error),
}
