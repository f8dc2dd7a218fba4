//! Palisade node daemon.
//!
//! One binary hosting both long-running roles:
//! - `palisaded mesh`: announce the audit root and relay proof bundles
//!   to the configured peers.
//! - `palisaded watch`: poll the audit root file and anchor every change.
//!
//! Both roles are configured entirely through `PALISADE_*` environment
//! variables; see [`palisade_core::config`].

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use palisade_capability::CapabilityIssuer;
use palisade_core::{logging, CapabilityConfig, ConfigError, NodeConfig, WatcherConfig};
use palisade_http::PortalClient;
use palisade_mesh::MeshDaemon;
use palisade_signing::Signer;

#[derive(Parser)]
#[command(name = "palisaded")]
#[command(version)]
#[command(about = "Palisade attestation mesh daemon")]
struct Cli {
    /// Emit JSON log lines instead of human-readable output
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the mesh relay: root announcements and proof-bundle fan-out
    Mesh,
    /// Run the root watcher: anchor every change to the audit root
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    match cli.command {
        Commands::Mesh => run_mesh().await,
        Commands::Watch => run_watch().await,
    }
}

async fn run_mesh() -> Result<()> {
    let config = NodeConfig::from_env().context("mesh daemon configuration")?;
    let signer = Signer::from_config(config.privkey_file.as_deref(), config.hmac_secret.as_deref())
        .context("signing configuration")?;

    let issuer = Arc::new(CapabilityIssuer::new(
        CapabilityConfig::from_env().context("capability configuration")?,
        signer.clone(),
    ));
    let portal = PortalClient::new(config.portal_url.clone(), Some(issuer))
        .context("portal client construction")?;

    let daemon = MeshDaemon::new(config, signer, portal).context("mesh daemon construction")?;
    daemon.run().await;
    Ok(())
}

async fn run_watch() -> Result<()> {
    let config = WatcherConfig::from_env().context("watcher configuration")?;

    let portal = match &config.portal_url {
        Some(url) => Some(portal_for_watcher(url).context("portal client construction")?),
        None => None,
    };

    let mut watcher = palisade_anchor::RootWatcher::new(config, portal);
    watcher.run().await;
    Ok(())
}

/// Portal client for anchor notifications.
///
/// Authenticated when a node identity is configured; a watcher running
/// without one still notifies, just without a bearer token.
fn portal_for_watcher(url: &str) -> Result<PortalClient> {
    let issuer = match CapabilityConfig::from_env() {
        Ok(cap_config) => {
            let privkey = std::env::var("PALISADE_PRIVKEY_FILE")
                .ok()
                .map(std::path::PathBuf::from);
            let hmac = std::env::var("PALISADE_HMAC_SECRET").ok();
            let signer = Signer::from_config(privkey.as_deref(), hmac.as_deref())
                .context("signing configuration")?;
            Some(Arc::new(CapabilityIssuer::new(cap_config, signer)))
        }
        Err(ConfigError::MissingEnv(_)) => {
            warn!("no node identity configured; anchor notifications will be unauthenticated");
            None
        }
        Err(err) => return Err(err).context("capability configuration"),
    };
    Ok(PortalClient::new(url, issuer)?)
}
