//! # Palisade Anchor
//!
//! Watches the local audit log's root file and durably anchors every
//! change.
//!
//! On each poll tick the watcher reads `<data_dir>/ROOT.txt`; when the
//! root's hash differs from the last one seen, it produces an
//! [`palisade_core::AnchorRecord`], either simulated (`dev-null`
//! backend) or by invoking an external anchoring command, persists it
//! to the immutable anchor history plus the `ANCHOR.json` latest
//! pointer, and notifies the portal best-effort.

mod backend;
mod error;
mod store;
mod watcher;

pub use backend::attempt_anchor;
pub use error::AnchorError;
pub use store::{load_latest, persist};
pub use watcher::RootWatcher;
