//! Scheme-agnostic signing over canonical payloads.

use palisade_canonical::canonical_bytes;
use serde::Serialize;
use std::path::Path;

use crate::error::SigningError;
use crate::keypair::{KeyPair, PublicKey};
use crate::secret::SharedSecret;

/// A configured signing scheme.
///
/// Signing canonicalizes the payload internally; callers hand over the
/// structured value, never pre-serialized bytes. The one exception is
/// [`Signer::sign_bytes`], for callers that sign a digest they computed
/// themselves.
#[derive(Debug, Clone)]
pub enum Signer {
    Ed25519(KeyPair),
    Hmac(SharedSecret),
}

impl Signer {
    /// Select a scheme from configuration: Ed25519 whenever a key file is
    /// configured, HMAC fallback otherwise.
    ///
    /// A weak fallback secret is logged as a configuration error but does
    /// not abort startup: the symmetric path is explicitly a development
    /// affordance.
    pub fn from_config(
        privkey_file: Option<&Path>,
        hmac_secret: Option<&str>,
    ) -> Result<Self, SigningError> {
        if let Some(path) = privkey_file {
            let keypair = KeyPair::from_seed_file(path)?;
            tracing::info!(key_id = %keypair.key_id(), "signing with Ed25519 key file");
            return Ok(Signer::Ed25519(keypair));
        }

        let secret = SharedSecret::new(hmac_secret.unwrap_or("dev-secret"));
        if secret.is_weak() {
            tracing::error!(
                "configuration error: HMAC fallback is using a known-weak default secret; \
                 set PALISADE_PRIVKEY_FILE or a strong PALISADE_HMAC_SECRET"
            );
        } else {
            tracing::warn!("no Ed25519 key file configured; using HMAC fallback");
        }
        Ok(Signer::Hmac(secret))
    }

    /// Sign a payload's canonical encoding.
    pub fn sign<T: Serialize>(&self, payload: &T) -> Result<Vec<u8>, SigningError> {
        Ok(self.sign_bytes(&canonical_bytes(payload)?))
    }

    /// Sign bytes the caller has already prepared, such as a payload
    /// digest.
    pub fn sign_bytes(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Signer::Ed25519(keypair) => keypair.sign_raw(data).to_vec(),
            Signer::Hmac(secret) => secret.mac(data).to_vec(),
        }
    }

    /// Sign a payload and hex-encode the signature (capability wire form).
    pub fn sign_hex<T: Serialize>(&self, payload: &T) -> Result<String, SigningError> {
        Ok(hex::encode(self.sign(payload)?))
    }

    /// The matching verification key.
    pub fn verifier(&self) -> VerifierKey {
        match self {
            Signer::Ed25519(keypair) => VerifierKey::Ed25519(keypair.public_key()),
            Signer::Hmac(secret) => VerifierKey::Hmac(secret.clone()),
        }
    }
}

/// Verification half of a [`Signer`].
#[derive(Debug, Clone)]
pub enum VerifierKey {
    Ed25519(PublicKey),
    Hmac(SharedSecret),
}

impl VerifierKey {
    /// Verify a signature over a payload's canonical encoding.
    ///
    /// Returns `false` for any malformed input: a verifier must treat a
    /// failed check as "untrusted", never as a crash.
    pub fn verify<T: Serialize>(&self, payload: &T, signature: &[u8]) -> bool {
        let Ok(bytes) = canonical_bytes(payload) else {
            return false;
        };
        self.verify_bytes(&bytes, signature)
    }

    /// Verify a signature over caller-prepared bytes, the counterpart of
    /// [`Signer::sign_bytes`].
    pub fn verify_bytes(&self, data: &[u8], signature: &[u8]) -> bool {
        match self {
            VerifierKey::Ed25519(public_key) => public_key.verify_raw(data, signature),
            VerifierKey::Hmac(secret) => secret.verify_mac(data, signature),
        }
    }

    /// Verify a hex-encoded signature, as carried by capability tokens.
    pub fn verify_hex<T: Serialize>(&self, payload: &T, signature_hex: &str) -> bool {
        match hex::decode(signature_hex) {
            Ok(signature) => self.verify(payload, &signature),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schemes() -> Vec<Signer> {
        vec![
            Signer::Ed25519(KeyPair::generate()),
            Signer::Hmac(SharedSecret::new("test-secret-material")),
        ]
    }

    #[test]
    fn round_trip_for_both_schemes() {
        let payload = json!({"root": "abc", "anchor": null});
        for signer in schemes() {
            let sig = signer.sign(&payload).unwrap();
            assert!(signer.verifier().verify(&payload, &sig));
        }
    }

    #[test]
    fn flipped_signature_byte_fails() {
        let payload = json!({"n": 1});
        for signer in schemes() {
            let mut sig = signer.sign(&payload).unwrap();
            sig[0] ^= 0x01;
            assert!(!signer.verifier().verify(&payload, &sig));
        }
    }

    #[test]
    fn changed_payload_fails() {
        for signer in schemes() {
            let sig = signer.sign(&json!({"n": 1})).unwrap();
            assert!(!signer.verifier().verify(&json!({"n": 2}), &sig));
        }
    }

    #[test]
    fn signature_is_over_canonical_bytes() {
        // key order in the payload must not matter
        let signer = Signer::Ed25519(KeyPair::generate());
        let sig = signer.sign(&json!({"b": 2, "a": 1})).unwrap();
        assert!(signer.verifier().verify(&json!({"a": 1, "b": 2}), &sig));
    }

    #[test]
    fn raw_bytes_round_trip() {
        for signer in schemes() {
            let digest = [7u8; 32];
            let sig = signer.sign_bytes(&digest);
            assert!(signer.verifier().verify_bytes(&digest, &sig));
            assert!(!signer.verifier().verify_bytes(&[8u8; 32], &sig));
        }
    }

    #[test]
    fn malformed_encodings_verify_false() {
        let signer = Signer::Hmac(SharedSecret::new("test-secret-material"));
        let verifier = signer.verifier();
        assert!(!verifier.verify_hex(&json!({}), "zzzz"));
        assert!(!verifier.verify(&json!({}), &[]));
        assert!(!verifier.verify_bytes(b"data", &[]));
    }

    #[test]
    fn uncanonicalizable_payload_verifies_false() {
        let signer = Signer::Ed25519(KeyPair::generate());
        assert!(signer.sign(&json!({"bad": 0.5})).is_err());
        assert!(!signer.verifier().verify(&json!({"bad": 0.5}), &[0u8; 64]));
    }
}
