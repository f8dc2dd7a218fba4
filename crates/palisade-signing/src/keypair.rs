//! Ed25519 keypairs and public keys.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::error::SigningError;

/// Ed25519 keypair used to sign capability tokens and mesh envelopes.
#[derive(Debug, Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Load a keypair from a seed file.
    ///
    /// Accepts either a raw 32-byte seed or its 64-character hex form
    /// (both appear in deployed key files).
    pub fn from_seed_file(path: &Path) -> Result<Self, SigningError> {
        let raw = fs::read(path).map_err(|e| SigningError::KeyFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let seed = decode_seed(&raw).ok_or_else(|| SigningError::KeyFile {
            path: path.display().to_string(),
            reason: "expected a raw 32-byte Ed25519 seed or 64 hex characters".to_string(),
        })?;
        Ok(Self::from_seed(&seed))
    }

    /// Build a keypair from a base64-encoded seed.
    pub fn from_base64(encoded: &str) -> Result<Self, SigningError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| SigningError::InvalidKey(format!("invalid base64: {e}")))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SigningError::InvalidKey("seed must be 32 bytes".to_string()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Export the seed as lowercase hex, for key files.
    pub fn seed_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Export the seed as base64.
    pub fn seed_base64(&self) -> String {
        BASE64.encode(self.signing_key.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Short identifier of the public key, e.g. for log lines.
    pub fn key_id(&self) -> String {
        self.public_key().id()
    }

    /// Sign raw bytes, returning the 64-byte signature.
    pub fn sign_raw(&self, data: &[u8]) -> [u8; 64] {
        self.signing_key.sign(data).to_bytes()
    }
}

fn decode_seed(raw: &[u8]) -> Option<[u8; 32]> {
    if raw.len() == 32 {
        let mut seed = [0u8; 32];
        seed.copy_from_slice(raw);
        return Some(seed);
    }
    let text = std::str::from_utf8(raw).ok()?.trim();
    let bytes = hex::decode(text).ok()?;
    bytes.try_into().ok()
}

/// Ed25519 public key for verification.
#[derive(Debug, Clone)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Parse from base64.
    pub fn from_base64(encoded: &str) -> Result<Self, SigningError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| SigningError::InvalidKey(format!("invalid base64: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Parse from 64 hex characters.
    pub fn from_hex(encoded: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(encoded.trim())
            .map_err(|e| SigningError::InvalidKey(format!("invalid hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    fn from_slice(bytes: &[u8]) -> Result<Self, SigningError> {
        let key_bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SigningError::InvalidKey("public key must be 32 bytes".to_string()))?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| SigningError::InvalidKey(format!("invalid public key: {e}")))?;
        Ok(Self { verifying_key })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.verifying_key.to_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.verifying_key.to_bytes())
    }

    /// Short id: first 4 bytes of the key's SHA-256, hex encoded.
    pub fn id(&self) -> String {
        let digest = Sha256::digest(self.verifying_key.to_bytes());
        hex::encode(&digest[..4])
    }

    /// Verify a signature over raw bytes. Malformed signatures verify as
    /// `false`, never as an error.
    pub fn verify_raw(&self, data: &[u8], signature: &[u8]) -> bool {
        let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_bytes);
        self.verifying_key.verify(data, &signature).is_ok()
    }
}
