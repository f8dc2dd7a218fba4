//! Palisade data model
//!
//! Wire and persistence types shared by the mesh daemon, the root watcher,
//! and the operator tooling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A statically configured mesh peer.
///
/// The public key is informational: verification of inbound envelopes is
/// the receiving node's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeshPeer {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub pubkey: String,
}

impl MeshPeer {
    /// Delivery URL for an envelope of the given kind.
    pub fn endpoint(&self, kind: EnvelopeKind) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), kind.mesh_path())
    }
}

/// What a mesh envelope carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    RootAnnounce,
    ProofBundle,
}

impl EnvelopeKind {
    /// Path component the envelope is POSTed to on each peer.
    pub fn mesh_path(&self) -> &'static str {
        match self {
            EnvelopeKind::RootAnnounce => "mesh/root",
            EnvelopeKind::ProofBundle => "mesh/proof",
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeKind::RootAnnounce => f.write_str("root_announce"),
            EnvelopeKind::ProofBundle => f.write_str("proof_bundle"),
        }
    }
}

/// Signed wrapper around an arbitrary payload relayed to peers.
///
/// `sig` covers the BLAKE3 digest of the canonical encoding of `payload`
/// alone, not the envelope fields, so a receiver can re-verify the
/// payload exactly as transmitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeshEnvelope {
    pub node_id: String,
    pub ts: DateTime<Utc>,
    pub kind: EnvelopeKind,
    pub payload: serde_json::Value,
    pub sig: String,
}

/// Outcome of a single anchor attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorStatus {
    /// No-op backend; the txid is derived from the root hash.
    Simulated,
    /// External backend accepted the root.
    Anchored,
    /// External backend exited with this code.
    Error(i32),
}

impl fmt::Display for AnchorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorStatus::Simulated => f.write_str("simulated"),
            AnchorStatus::Anchored => f.write_str("anchored"),
            AnchorStatus::Error(code) => write!(f, "error:{code}"),
        }
    }
}

impl FromStr for AnchorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simulated" => Ok(AnchorStatus::Simulated),
            "anchored" => Ok(AnchorStatus::Anchored),
            other => match other.strip_prefix("error:") {
                Some(code) => code
                    .parse::<i32>()
                    .map(AnchorStatus::Error)
                    .map_err(|_| format!("bad anchor status {other:?}")),
                None => Err(format!("bad anchor status {other:?}")),
            },
        }
    }
}

impl Serialize for AnchorStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnchorStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Durable record of one anchor attempt, appended to the anchor history
/// and mirrored into the latest pointer. Never updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnchorRecord {
    /// Audit-log root being anchored, verbatim.
    pub root: String,
    /// BLAKE3 of the root text, lowercase hex.
    pub root_hash: String,
    pub ts: DateTime<Utc>,
    /// Anchoring backend: `dev-null` for simulated, backend name otherwise.
    pub chain: String,
    pub txid: String,
    pub status: AnchorStatus,
    /// External command that was run, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Captured stderr when the external backend failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn envelope_kind_paths() {
        assert_eq!(EnvelopeKind::RootAnnounce.mesh_path(), "mesh/root");
        assert_eq!(EnvelopeKind::ProofBundle.mesh_path(), "mesh/proof");
    }

    #[test]
    fn peer_endpoint_strips_trailing_slash() {
        let peer = MeshPeer {
            id: "peer-1".into(),
            url: "http://peer-1:9200/".into(),
            pubkey: String::new(),
        };
        assert_eq!(
            peer.endpoint(EnvelopeKind::ProofBundle),
            "http://peer-1:9200/mesh/proof"
        );
    }

    #[test]
    fn envelope_wire_shape() {
        let env = MeshEnvelope {
            node_id: "node-a".into(),
            ts: "2026-08-24T10:00:00Z".parse().unwrap(),
            kind: EnvelopeKind::RootAnnounce,
            payload: json!({"root": "abc"}),
            sig: "c2ln".into(),
        };
        let wire = serde_json::to_value(&env).unwrap();
        assert_eq!(wire["kind"], "root_announce");
        assert_eq!(wire["ts"], "2026-08-24T10:00:00Z");
        assert_eq!(wire["payload"]["root"], "abc");
    }

    #[test]
    fn anchor_status_round_trip() {
        for status in [
            AnchorStatus::Simulated,
            AnchorStatus::Anchored,
            AnchorStatus::Error(13),
        ] {
            let text = serde_json::to_string(&status).unwrap();
            let back: AnchorStatus = serde_json::from_str(&text).unwrap();
            assert_eq!(back, status);
        }
        assert_eq!(
            serde_json::to_string(&AnchorStatus::Error(2)).unwrap(),
            r#""error:2""#
        );
    }

    #[test]
    fn anchor_record_omits_empty_diagnostics() {
        let record = AnchorRecord {
            root: "abc".into(),
            root_hash: "00".repeat(32),
            ts: Utc::now(),
            chain: "dev-null".into(),
            txid: "demo-0011223344556677".into(),
            status: AnchorStatus::Simulated,
            command: None,
            error: None,
        };
        let wire = serde_json::to_value(&record).unwrap();
        assert!(wire.get("command").is_none());
        assert!(wire.get("error").is_none());
        assert_eq!(wire["status"], "simulated");
    }
}
