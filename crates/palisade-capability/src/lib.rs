//! # Palisade Capability
//!
//! Short-lived, signed capability tokens authorizing a node's calls to
//! the central portal.
//!
//! The wire format is base64 of canonical JSON: the claims object
//! `{sub, aud, scopes, constraints, issued_by, iat, exp, nonce}` plus a
//! hex `signature` computed over the canonical encoding of the claims
//! alone. Timestamps are integer Unix seconds.
//!
//! [`CapabilityIssuer`] caches the current token and re-mints it inside a
//! fixed renewal window before expiry; the cache is safe under concurrent
//! `token()` calls.
//!
//! # Example
//!
//! ```
//! use palisade_capability::{mint, CapabilityClaims, CapabilityToken};
//! use palisade_signing::{KeyPair, Signer};
//!
//! let signer = Signer::Ed25519(KeyPair::generate());
//! let claims = CapabilityClaims::new(
//!     "guardian-1",
//!     "palisade-portal",
//!     vec!["infrastructure:write".into()],
//!     "did:palisade:guardian-1",
//!     1_756_000_000,
//!     300,
//! );
//!
//! let wire = mint(&claims, &signer).unwrap();
//! let token = CapabilityToken::decode(&wire).unwrap();
//! token
//!     .verify(&signer.verifier(), "palisade-portal", 1_756_000_100)
//!     .unwrap();
//! ```

mod error;
mod issuer;
mod token;

pub use error::CapabilityError;
pub use issuer::{CapabilityIssuer, Clock, SystemClock};
pub use token::{mint, CapabilityClaims, CapabilityToken};
