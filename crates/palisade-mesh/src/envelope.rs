//! Envelope construction and verification.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use serde_json::Value;

use palisade_canonical::canonical_bytes;
use palisade_core::{EnvelopeKind, MeshEnvelope};
use palisade_signing::{Signer, VerifierKey};

use crate::error::MeshError;

/// Bytes a mesh signature covers: the BLAKE3 digest of the payload's
/// canonical encoding. Receivers recompute the digest from the payload as
/// transmitted, then check the signature against it.
fn payload_digest(payload: &Value) -> Result<[u8; 32], MeshError> {
    let bytes = canonical_bytes(payload)?;
    Ok(*blake3::hash(&bytes).as_bytes())
}

/// Wrap a payload in a signed envelope. Pure: no I/O, no retries.
///
/// The signature covers the digest of `payload` alone, not the envelope
/// metadata. A payload that cannot be canonicalized (floats, non-JSON
/// values) is rejected here, before anything is signed.
pub fn build_envelope(
    kind: EnvelopeKind,
    node_id: &str,
    payload: Value,
    signer: &Signer,
) -> Result<MeshEnvelope, MeshError> {
    let digest = payload_digest(&payload)?;
    let sig = BASE64.encode(signer.sign_bytes(&digest));
    Ok(MeshEnvelope {
        node_id: node_id.to_string(),
        ts: Utc::now(),
        kind,
        payload,
        sig,
    })
}

/// Receiver-side check: does the envelope's signature cover its payload?
pub fn verify_envelope(envelope: &MeshEnvelope, key: &VerifierKey) -> bool {
    let Ok(digest) = payload_digest(&envelope.payload) else {
        return false;
    };
    match BASE64.decode(&envelope.sig) {
        Ok(sig) => key.verify_bytes(&digest, &sig),
        Err(_) => false,
    }
}
