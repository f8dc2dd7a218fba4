//! The mesh daemon: periodic root announcement and proof relay.

use chrono::Utc;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use palisade_core::{EnvelopeKind, NodeConfig};
use palisade_http::{peer_client, PortalClient};
use palisade_signing::Signer;

use crate::broadcast::{broadcast, BroadcastReport};
use crate::envelope::build_envelope;
use crate::error::MeshError;

/// Long-running relay loop for one node.
///
/// Each tick announces the current audit root (if one exists) and relays
/// recent proof bundles from the portal to every peer. Tick failures are
/// logged and the loop continues; only configuration errors at
/// construction time are fatal.
pub struct MeshDaemon {
    config: NodeConfig,
    signer: Signer,
    portal: PortalClient,
    peers_http: reqwest::Client,
}

impl MeshDaemon {
    pub fn new(config: NodeConfig, signer: Signer, portal: PortalClient) -> Result<Self, MeshError> {
        Ok(MeshDaemon {
            peers_http: peer_client()?,
            config,
            signer,
            portal,
        })
    }

    /// Announce the current root and its anchor to every peer.
    ///
    /// Returns `None` (after an explicit logged skip) when no root is
    /// known yet.
    pub async fn announce_root(&self) -> Result<Option<BroadcastReport>, MeshError> {
        let Some(payload) = read_root_announce(&self.config.data_dir) else {
            info!("no audit root yet; skipping root_announce");
            return Ok(None);
        };

        let envelope = build_envelope(
            EnvelopeKind::RootAnnounce,
            &self.config.node_id,
            payload,
            &self.signer,
        )?;
        let report = broadcast(&self.peers_http, &envelope, &self.config.peers).await;
        info!(
            delivered = report.delivered,
            attempted = report.attempted,
            "announced root to mesh"
        );
        Ok(Some(report))
    }

    /// Fetch up to `limit` recent receipts and relay each proof bundle.
    ///
    /// Per-receipt failures (missing id, unfetchable bundle, payload that
    /// will not canonicalize) are logged skips, never fatal to the batch.
    /// Returns the number of bundles relayed.
    pub async fn relay_recent_proofs(&self, limit: usize) -> usize {
        let receipts = match self.portal.recent_receipts(limit).await {
            Ok(receipts) => receipts,
            Err(err) => {
                warn!(%err, "failed to fetch recent receipts");
                return 0;
            }
        };
        if receipts.is_empty() {
            info!("no receipts to relay");
            return 0;
        }

        let mut relayed = 0;
        for receipt in &receipts {
            let Some(receipt_id) = receipt_id(receipt) else {
                warn!(?receipt, "receipt without an id; skipping");
                continue;
            };

            let mut bundle = match self.portal.proof_bundle(receipt_id).await {
                Ok(bundle) => bundle,
                Err(err) => {
                    warn!(receipt_id, %err, "failed to fetch proof bundle; skipping");
                    continue;
                }
            };

            self.decorate_bundle(&mut bundle);

            let envelope = match build_envelope(
                EnvelopeKind::ProofBundle,
                &self.config.node_id,
                bundle,
                &self.signer,
            ) {
                Ok(envelope) => envelope,
                Err(err) => {
                    warn!(receipt_id, %err, "proof bundle not canonicalizable; skipping");
                    continue;
                }
            };

            broadcast(&self.peers_http, &envelope, &self.config.peers).await;
            relayed += 1;
        }
        relayed
    }

    /// Tag the bundle with its origin. Existing tags are left alone so a
    /// re-relayed bundle keeps its original source.
    fn decorate_bundle(&self, bundle: &mut Value) {
        if let Value::Object(map) = bundle {
            map.entry("source_node")
                .or_insert_with(|| Value::String(self.config.node_id.clone()));
            map.entry("realm")
                .or_insert_with(|| Value::String(self.config.realm.clone()));
        }
    }

    /// One unit of daemon work; errors are contained here.
    pub async fn tick(&self) {
        if let Err(err) = self.announce_root().await {
            error!(%err, "root announcement failed");
        }
        self.relay_recent_proofs(self.config.receipts_limit).await;
    }

    /// Run forever at the configured interval.
    pub async fn run(&self) {
        info!(
            node_id = %self.config.node_id,
            peers = self.config.peers.len(),
            interval_secs = self.config.interval.as_secs(),
            "mesh daemon started"
        );
        loop {
            self.tick().await;
            tokio::time::sleep(self.config.interval).await;
        }
    }
}

fn receipt_id(receipt: &Value) -> Option<&str> {
    receipt
        .get("id")
        .or_else(|| receipt.get("receipt_id"))
        .and_then(Value::as_str)
}

/// Read `ROOT.txt` and the latest anchor from the data directory.
///
/// An absent or unreadable root file means "no root yet", not an error;
/// an unparsable `ANCHOR.json` degrades to a null anchor.
fn read_root_announce(data_dir: &Path) -> Option<Value> {
    let root = fs::read_to_string(data_dir.join("ROOT.txt")).ok()?;
    let root = root.trim();
    if root.is_empty() {
        return None;
    }

    let anchor = fs::read(data_dir.join("ANCHOR.json"))
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .unwrap_or(Value::Null);

    Some(json!({
        "root": root,
        "ts": Utc::now(),
        "anchor": anchor,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_id_supports_both_field_names() {
        assert_eq!(receipt_id(&json!({"id": "r1"})), Some("r1"));
        assert_eq!(receipt_id(&json!({"receipt_id": "r2"})), Some("r2"));
        assert_eq!(receipt_id(&json!({"other": 1})), None);
        assert_eq!(receipt_id(&json!({"id": 7})), None);
    }

    #[test]
    fn missing_root_file_is_no_announcement() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_root_announce(dir.path()).is_none());

        std::fs::write(dir.path().join("ROOT.txt"), "  \n").unwrap();
        assert!(read_root_announce(dir.path()).is_none());
    }

    #[test]
    fn root_with_garbled_anchor_degrades_to_null() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ROOT.txt"), "abc123\n").unwrap();
        std::fs::write(dir.path().join("ANCHOR.json"), "{ not json").unwrap();

        let payload = read_root_announce(dir.path()).unwrap();
        assert_eq!(payload["root"], "abc123");
        assert_eq!(payload["anchor"], Value::Null);
    }

    #[test]
    fn root_with_anchor_is_carried_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ROOT.txt"), "abc123").unwrap();
        std::fs::write(
            dir.path().join("ANCHOR.json"),
            r#"{"txid":"demo-00112233","chain":"dev-null"}"#,
        )
        .unwrap();

        let payload = read_root_announce(dir.path()).unwrap();
        assert_eq!(payload["anchor"]["txid"], "demo-00112233");
    }
}
