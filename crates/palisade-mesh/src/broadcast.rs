//! Best-effort envelope fan-out.

use reqwest::Client;
use tracing::{debug, warn};

use palisade_core::{MeshEnvelope, MeshPeer};
use palisade_http::post_json;

/// What happened during one fan-out pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub attempted: usize,
    pub delivered: usize,
}

/// POST an envelope to every configured peer.
///
/// Deliveries are independent: a peer that is down, slow, or returning
/// errors is logged and skipped, and the remaining peers are still
/// attempted. Nothing here retries; the next tick re-announces roots
/// naturally.
pub async fn broadcast(
    client: &Client,
    envelope: &MeshEnvelope,
    peers: &[MeshPeer],
) -> BroadcastReport {
    let mut report = BroadcastReport::default();

    for peer in peers {
        report.attempted += 1;
        let url = peer.endpoint(envelope.kind);
        match post_json(client, &url, envelope).await {
            Ok(()) => {
                debug!(peer = %peer.id, kind = %envelope.kind, "envelope delivered");
                report.delivered += 1;
            }
            Err(err) => {
                warn!(peer = %peer.id, %url, %err, "envelope delivery failed");
            }
        }
    }

    report
}
