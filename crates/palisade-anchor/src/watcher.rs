//! Poll loop that anchors every change to the audit root.

use std::fs;
use tracing::{error, info, warn};

use palisade_canonical::hash_string;
use palisade_core::{AnchorRecord, WatcherConfig};
use palisade_http::PortalClient;

use crate::backend::attempt_anchor;
use crate::error::AnchorError;
use crate::store::persist;

/// Watches `<data_dir>/ROOT.txt` and anchors each new root exactly once
/// per process lifetime.
///
/// Change detection compares the BLAKE3 hash of the current root against
/// the last one seen in memory, so rewriting the file with identical
/// content does not produce a duplicate record. The watcher starts with
/// no last-seen hash: a root already present at startup is anchored on
/// the first tick, including after a restart.
pub struct RootWatcher {
    config: WatcherConfig,
    portal: Option<PortalClient>,
    last_seen: Option<String>,
}

impl RootWatcher {
    pub fn new(config: WatcherConfig, portal: Option<PortalClient>) -> Self {
        RootWatcher {
            config,
            portal,
            last_seen: None,
        }
    }

    /// One poll pass. Returns the fresh record when the root changed.
    ///
    /// `last_seen` only advances after the record is persisted, so a
    /// failed write is retried on the next tick.
    pub async fn tick(&mut self) -> Result<Option<AnchorRecord>, AnchorError> {
        let Some(root) = self.read_root() else {
            return Ok(None);
        };

        let root_hash = hash_string(&root);
        if self.last_seen.as_deref() == Some(root_hash.as_str()) {
            return Ok(None);
        }

        let record = attempt_anchor(&root, &self.config).await;
        let path = persist(&self.config.data_dir, &record)?;
        self.last_seen = Some(root_hash);
        info!(
            txid = %record.txid,
            status = %record.status,
            path = %path.display(),
            "root anchored"
        );

        self.notify_portal(&record).await;
        Ok(Some(record))
    }

    /// Run forever, logging tick failures instead of exiting.
    pub async fn run(&mut self) {
        info!(
            data_dir = %self.config.data_dir.display(),
            interval = ?self.config.poll_interval,
            "root watcher started"
        );
        loop {
            if let Err(err) = self.tick().await {
                error!(%err, "anchor tick failed");
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// An absent or empty root file means nothing to anchor yet.
    fn read_root(&self) -> Option<String> {
        let path = self.config.data_dir.join("ROOT.txt");
        let root = fs::read_to_string(path).ok()?;
        let root = root.trim();
        if root.is_empty() {
            None
        } else {
            Some(root.to_string())
        }
    }

    async fn notify_portal(&self, record: &AnchorRecord) {
        let Some(portal) = &self.portal else {
            return;
        };
        if let Err(err) = portal.post_anchor(record).await {
            warn!(%err, portal = portal.base_url(), "anchor notification failed");
        }
    }
}
