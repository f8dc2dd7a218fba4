//! Environment-driven configuration
//!
//! The daemons are configured entirely from the environment so they can
//! run as separate processes sharing nothing but the data directory.
//! Missing identity or unparsable peer configuration is fatal at startup;
//! everything else has a development default.

use crate::error::ConfigError;
use crate::types::MeshPeer;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default portal endpoint for development setups.
pub const DEFAULT_PORTAL_URL: &str = "http://localhost:9115";

/// Capability audience the portal verifies against.
pub const DEFAULT_AUDIENCE: &str = "palisade-portal";

/// Configuration for the mesh daemon.
///
/// Required:
///   `PALISADE_NODE_ID`
///
/// Optional:
///   `PALISADE_PRIVKEY_FILE`     Ed25519 seed file (preferred signer)
///   `PALISADE_HMAC_SECRET`      symmetric fallback secret
///   `PALISADE_PEERS`            JSON array of `{id,url,pubkey}`
///   `PALISADE_PORTAL_URL`       default `http://localhost:9115`
///   `PALISADE_DATA_DIR`         default `./data`
///   `PALISADE_INTERVAL_SECS`    default 60
///   `PALISADE_RECEIPTS_LIMIT`   default 10
///   `PALISADE_REALM`            default `default`
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub node_id: String,
    pub privkey_file: Option<PathBuf>,
    pub hmac_secret: Option<String>,
    pub peers: Vec<MeshPeer>,
    pub portal_url: String,
    pub data_dir: PathBuf,
    pub interval: Duration,
    pub receipts_limit: usize,
    pub realm: String,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let node_id = require_env("PALISADE_NODE_ID")?;

        let peers_json = env_or("PALISADE_PEERS", "[]");
        let peers: Vec<MeshPeer> = serde_json::from_str(&peers_json)
            .map_err(|e| ConfigError::invalid("PALISADE_PEERS", e.to_string()))?;

        Ok(NodeConfig {
            node_id,
            privkey_file: env::var("PALISADE_PRIVKEY_FILE").ok().map(PathBuf::from),
            hmac_secret: env::var("PALISADE_HMAC_SECRET").ok(),
            peers,
            portal_url: trimmed_url(env_or("PALISADE_PORTAL_URL", DEFAULT_PORTAL_URL)),
            data_dir: PathBuf::from(env_or("PALISADE_DATA_DIR", "./data")),
            interval: Duration::from_secs(parse_env("PALISADE_INTERVAL_SECS", 60)?),
            receipts_limit: parse_env("PALISADE_RECEIPTS_LIMIT", 10)?,
            realm: env_or("PALISADE_REALM", "default"),
        })
    }
}

/// Configuration for the root anchor watcher.
///
/// Optional:
///   `PALISADE_DATA_DIR`           default `./data`
///   `PALISADE_POLL_INTERVAL_SECS` default 5
///   `PALISADE_ANCHOR_CMD`         command template with a `{root}` placeholder
///   `PALISADE_ANCHOR_CHAIN`       backend name for external mode, default `external`
///   `PALISADE_PORTAL_URL`         enables best-effort anchor notification
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub data_dir: PathBuf,
    pub poll_interval: Duration,
    pub anchor_cmd: Option<String>,
    pub anchor_chain: String,
    pub portal_url: Option<String>,
}

impl WatcherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(WatcherConfig {
            data_dir: PathBuf::from(env_or("PALISADE_DATA_DIR", "./data")),
            poll_interval: Duration::from_secs(parse_env("PALISADE_POLL_INTERVAL_SECS", 5)?),
            anchor_cmd: env::var("PALISADE_ANCHOR_CMD").ok().filter(|c| !c.is_empty()),
            anchor_chain: env_or("PALISADE_ANCHOR_CHAIN", "external"),
            portal_url: env::var("PALISADE_PORTAL_URL").ok().map(trimmed_url),
        })
    }
}

/// Configuration for the capability issuer.
///
/// Required:
///   `PALISADE_GUARDIAN_ID` (falls back to `PALISADE_NODE_ID`)
///
/// Optional:
///   `PALISADE_CAP_AUDIENCE`   default `palisade-portal`
///   `PALISADE_CAP_SCOPES`     CSV allow-list, e.g. `infrastructure:write`
///   `PALISADE_ISSUER`         issuer DID, default `did:palisade:<subject>`
///   `PALISADE_CAP_LIFETIME_SECS` default 300
///   `PALISADE_CAP_RENEWAL_SECS`  default 120
#[derive(Debug, Clone)]
pub struct CapabilityConfig {
    pub subject: String,
    pub audience: String,
    pub scopes: Vec<String>,
    pub issued_by: String,
    pub lifetime_secs: i64,
    pub renewal_window_secs: i64,
}

impl CapabilityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // No resolvable identity is a fatal startup error, not something
        // deferred to the first token request.
        let subject = env::var("PALISADE_GUARDIAN_ID")
            .or_else(|_| env::var("PALISADE_NODE_ID"))
            .map_err(|_| ConfigError::MissingEnv("PALISADE_GUARDIAN_ID"))?;
        if subject.is_empty() {
            return Err(ConfigError::MissingEnv("PALISADE_GUARDIAN_ID"));
        }

        let issued_by = env_or("PALISADE_ISSUER", &format!("did:palisade:{subject}"));

        Ok(CapabilityConfig {
            subject,
            audience: env_or("PALISADE_CAP_AUDIENCE", DEFAULT_AUDIENCE),
            scopes: parse_csv(&env_or("PALISADE_CAP_SCOPES", "")),
            issued_by,
            lifetime_secs: parse_env("PALISADE_CAP_LIFETIME_SECS", 300)?,
            renewal_window_secs: parse_env("PALISADE_CAP_RENEWAL_SECS", 120)?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn trimmed_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn parse_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(name, e.to_string())),
        Err(_) => Ok(default),
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_scopes_parse() {
        assert_eq!(
            parse_csv("infrastructure:write, offsec:write ,"),
            vec!["infrastructure:write", "offsec:write"]
        );
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn url_trimming() {
        assert_eq!(
            trimmed_url("http://portal:9115/".into()),
            "http://portal:9115"
        );
    }
}
