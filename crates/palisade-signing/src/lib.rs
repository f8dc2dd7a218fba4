//! # Palisade Signing
//!
//! Signature production and verification over canonical payloads.
//!
//! Two interchangeable schemes back the same [`Signer`] interface:
//!
//! - **Ed25519** ([`KeyPair`]): the production scheme, selected whenever a
//!   private key file is configured.
//! - **HMAC-SHA256** ([`SharedSecret`]): a development fallback using a
//!   shared secret; configuring a known-weak default is flagged as a
//!   configuration error at startup.
//!
//! Signing always canonicalizes the payload internally, so independently
//! built processes produce identical signatures for equal values.
//! Verification never fails with an error: a malformed signature simply
//! verifies as `false`.
//!
//! # Example
//!
//! ```
//! use palisade_signing::{KeyPair, Signer};
//!
//! let signer = Signer::Ed25519(KeyPair::generate());
//! let payload = serde_json::json!({"root": "abc", "height": 7});
//!
//! let sig = signer.sign(&payload).unwrap();
//! assert!(signer.verifier().verify(&payload, &sig));
//!
//! let tampered = serde_json::json!({"root": "abd", "height": 7});
//! assert!(!signer.verifier().verify(&tampered, &sig));
//! ```

mod error;
mod keypair;
mod secret;
mod signer;

pub use error::SigningError;
pub use keypair::{KeyPair, PublicKey};
pub use secret::SharedSecret;
pub use signer::{Signer, VerifierKey};
