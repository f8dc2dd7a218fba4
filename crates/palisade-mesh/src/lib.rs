//! # Palisade Mesh
//!
//! Gossip-style relay of audit-log attestations to a configured peer set.
//!
//! Two envelope kinds travel the mesh: `root_announce` (the current audit
//! root plus its anchor record) and `proof_bundle` (supporting evidence
//! for a single receipt, fetched from the portal). Envelope signatures
//! cover the BLAKE3 digest of the canonical payload alone, and fan-out is
//! best-effort and independent per peer and per receipt: one unreachable
//! peer or malformed receipt never blocks propagation of the rest.

mod broadcast;
mod envelope;
mod error;
mod relay;

pub use broadcast::{broadcast, BroadcastReport};
pub use envelope::{build_envelope, verify_envelope};
pub use error::MeshError;
pub use relay::MeshDaemon;
