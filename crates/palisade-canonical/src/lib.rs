//! # Palisade Canonical
//!
//! Deterministic JSON encoding and content hashing for the Palisade
//! attestation mesh.
//!
//! Every signature in Palisade (capability tokens and mesh envelopes
//! alike) is computed over canonical bytes, so two processes that agree
//! on a logical value must agree on its encoding byte-for-byte.
//!
//! ## Canonical JSON rules
//!
//! 1. Object keys sorted lexicographically by UTF-8 bytes at every depth
//! 2. Arrays preserve insertion order
//! 3. No insignificant whitespace
//! 4. UTF-8 encoding, serde_json string escaping
//! 5. **Floats are not allowed**: encode fractional values as strings
//!
//! ## Example
//!
//! ```rust
//! use palisade_canonical::{canonical_string, hash_canonical};
//!
//! let value = serde_json::json!({"b": 1, "a": 2});
//! let canonical = canonical_string(&value).unwrap();
//! assert_eq!(canonical, r#"{"a":2,"b":1}"#);
//!
//! // BLAKE3 over the canonical bytes, as lowercase hex
//! let digest = hash_canonical(&value).unwrap();
//! assert_eq!(digest.len(), 64);
//! ```

mod canonical;
mod error;
mod hash;

pub use canonical::*;
pub use error::*;
pub use hash::*;
