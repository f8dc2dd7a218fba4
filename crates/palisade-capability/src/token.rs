//! Capability token schema, minting, and verification.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use palisade_canonical::canonical_bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use palisade_signing::{Signer, VerifierKey};

use crate::error::CapabilityError;

/// Signed claims of a capability token.
///
/// `scopes` is an allow-list of permission strings carried verbatim in
/// the order it was configured; `nonce` makes every issuance distinct
/// even when all other fields repeat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapabilityClaims {
    pub sub: String,
    pub aud: String,
    pub scopes: Vec<String>,
    #[serde(default)]
    pub constraints: Map<String, Value>,
    pub issued_by: String,
    /// Unix seconds.
    pub iat: i64,
    /// Unix seconds; must be greater than `iat`.
    pub exp: i64,
    pub nonce: String,
}

impl CapabilityClaims {
    /// Build claims for a token minted at `now` with the given lifetime,
    /// stamping a fresh random nonce.
    pub fn new(
        sub: impl Into<String>,
        aud: impl Into<String>,
        scopes: Vec<String>,
        issued_by: impl Into<String>,
        now: i64,
        lifetime_secs: i64,
    ) -> Self {
        CapabilityClaims {
            sub: sub.into(),
            aud: aud.into(),
            scopes,
            constraints: Map::new(),
            issued_by: issued_by.into(),
            iat: now,
            exp: now + lifetime_secs,
            nonce: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// A decoded capability token: claims plus their hex signature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CapabilityToken {
    #[serde(flatten)]
    claims: CapabilityClaims,
    signature: String,
}

/// Mint a token: sign the canonical claims, append the hex signature,
/// and base64-encode the canonical JSON of the whole object.
pub fn mint(claims: &CapabilityClaims, signer: &Signer) -> Result<String, CapabilityError> {
    let signature = signer.sign_hex(claims)?;
    let token = CapabilityToken {
        claims: claims.clone(),
        signature,
    };
    Ok(BASE64.encode(canonical_bytes(&token)?))
}

impl CapabilityToken {
    pub fn claims(&self) -> &CapabilityClaims {
        &self.claims
    }

    pub fn signature_hex(&self) -> &str {
        &self.signature
    }

    /// Decode the wire form without verifying anything.
    pub fn decode(wire: &str) -> Result<Self, CapabilityError> {
        let bytes = BASE64
            .decode(wire.trim())
            .map_err(|e| CapabilityError::Malformed(format!("invalid base64: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CapabilityError::Malformed(format!("invalid claims JSON: {e}")))
    }

    /// Check the token against a verifier's identity and clock.
    ///
    /// A token is valid only if it is unexpired, addressed to this
    /// audience, and carries a signature that verifies over the canonical
    /// claims. Every failure mode is an `Err`, never a panic.
    pub fn verify(
        &self,
        key: &VerifierKey,
        audience: &str,
        now: i64,
    ) -> Result<(), CapabilityError> {
        if now >= self.claims.exp {
            return Err(CapabilityError::Expired {
                exp: self.claims.exp,
                now,
            });
        }
        if self.claims.aud != audience {
            return Err(CapabilityError::AudienceMismatch {
                expected: audience.to_string(),
                found: self.claims.aud.clone(),
            });
        }
        if !key.verify_hex(&self.claims, &self.signature) {
            return Err(CapabilityError::InvalidSignature);
        }
        Ok(())
    }
}
