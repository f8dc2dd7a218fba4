//! Durable anchor record storage.
//!
//! Every attempt appends one immutable file under `anchors/` and
//! overwrites the single `ANCHOR.json` latest pointer, so peers and the
//! mesh daemon always find the most recent record at a fixed path.

use chrono::SecondsFormat;
use std::fs;
use std::path::{Path, PathBuf};

use palisade_core::AnchorRecord;

use crate::error::AnchorError;

/// Write a record to the anchor history and the latest pointer.
///
/// Returns the path of the immutable history file. Records are written
/// regardless of status: failed anchor attempts are evidence too.
pub fn persist(data_dir: &Path, record: &AnchorRecord) -> Result<PathBuf, AnchorError> {
    let anchors_dir = data_dir.join("anchors");
    fs::create_dir_all(&anchors_dir)?;

    let body = serde_json::to_vec_pretty(record)?;

    // colons are not portable in file names
    let stamp = record
        .ts
        .to_rfc3339_opts(SecondsFormat::Micros, true)
        .replace(':', "-");
    let snapshot = anchors_dir.join(format!("{stamp}.json"));
    fs::write(&snapshot, &body)?;

    fs::write(data_dir.join("ANCHOR.json"), &body)?;
    Ok(snapshot)
}

/// Read the latest pointer, if a parsable one exists.
pub fn load_latest(data_dir: &Path) -> Option<AnchorRecord> {
    let bytes = fs::read(data_dir.join("ANCHOR.json")).ok()?;
    serde_json::from_slice(&bytes).ok()
}
