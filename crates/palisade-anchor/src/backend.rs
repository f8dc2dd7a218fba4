//! Anchor backends: simulated and external-command.

use chrono::Utc;
use tokio::process::Command;
use tracing::warn;

use palisade_canonical::{hash_bytes, hash_string};
use palisade_core::{AnchorRecord, AnchorStatus, WatcherConfig};

/// Backend name for the no-op simulated anchor.
const DEV_NULL_CHAIN: &str = "dev-null";

/// Exit-code stand-in when the external command could not be run at all.
const SPAWN_FAILURE_CODE: i32 = 127;

/// Produce one anchor record for the given root.
///
/// With no command configured this is a simulated anchor; otherwise the
/// configured command template runs with `{root}` substituted. Either
/// way a record comes back; failures are captured in it, not raised.
pub async fn attempt_anchor(root: &str, config: &WatcherConfig) -> AnchorRecord {
    match &config.anchor_cmd {
        None => simulated(root),
        Some(template) => external(root, template, &config.anchor_chain).await,
    }
}

/// Simulated anchor: a deterministic placeholder txid derived from the
/// root's hash.
fn simulated(root: &str) -> AnchorRecord {
    let root_hash = hash_string(root);
    AnchorRecord {
        txid: format!("demo-{}", &root_hash[..16]),
        root: root.to_string(),
        root_hash,
        ts: Utc::now(),
        chain: DEV_NULL_CHAIN.to_string(),
        status: AnchorStatus::Simulated,
        command: None,
        error: None,
    }
}

/// External anchor: run the command template with the root substituted.
async fn external(root: &str, template: &str, chain: &str) -> AnchorRecord {
    let root_hash = hash_string(root);
    let argv = render_command(template, root);
    let command_line = argv.join(" ");

    let mut record = AnchorRecord {
        root: root.to_string(),
        root_hash: root_hash.clone(),
        ts: Utc::now(),
        chain: chain.to_string(),
        txid: String::new(),
        status: AnchorStatus::Error(SPAWN_FAILURE_CODE),
        command: Some(command_line),
        error: None,
    };

    let Some((program, args)) = argv.split_first() else {
        record.error = Some("empty anchor command template".to_string());
        return record;
    };

    let output = match Command::new(program).args(args).output().await {
        Ok(output) => output,
        Err(err) => {
            warn!(%err, program, "anchor command could not be spawned");
            record.error = Some(err.to_string());
            return record;
        }
    };

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        record.txid = stdout
            .lines()
            .next()
            .map(|line| line.trim().chars().take(64).collect::<String>())
            .filter(|line| !line.is_empty())
            .unwrap_or_else(|| hash_bytes(&output.stdout)[..32].to_string());
        record.status = AnchorStatus::Anchored;
    } else {
        let code = output.status.code().unwrap_or(-1);
        record.status = AnchorStatus::Error(code);
        record.error = Some(String::from_utf8_lossy(&output.stderr).trim().to_string());
    }
    record
}

/// Split the template into argv tokens and substitute `{root}`.
///
/// The command runs without a shell and the root lands inside a single
/// argv element, so a hostile root value cannot inject commands.
fn render_command(template: &str, root: &str) -> Vec<String> {
    template
        .split_whitespace()
        .map(|token| token.replace("{root}", root))
        .collect()
}
