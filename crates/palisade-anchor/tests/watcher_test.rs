//! End-to-end watcher behavior against a temporary data directory.

use std::fs;
use std::path::Path;
use std::time::Duration;

use palisade_anchor::{load_latest, RootWatcher};
use palisade_core::{AnchorStatus, WatcherConfig};

fn config(data_dir: &Path) -> WatcherConfig {
    WatcherConfig {
        data_dir: data_dir.to_path_buf(),
        poll_interval: Duration::from_secs(5),
        anchor_cmd: None,
        anchor_chain: "external".into(),
        portal_url: None,
    }
}

fn write_root(data_dir: &Path, root: &str) {
    fs::write(data_dir.join("ROOT.txt"), root).unwrap();
}

#[tokio::test]
async fn missing_or_empty_root_is_a_quiet_tick() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = RootWatcher::new(config(dir.path()), None);

    assert!(watcher.tick().await.unwrap().is_none());

    write_root(dir.path(), "   \n");
    assert!(watcher.tick().await.unwrap().is_none());
    assert!(load_latest(dir.path()).is_none());
}

#[tokio::test]
async fn unchanged_root_is_anchored_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = RootWatcher::new(config(dir.path()), None);

    write_root(dir.path(), "abc");
    let record = watcher.tick().await.unwrap().unwrap();
    assert_eq!(record.root, "abc");
    assert_eq!(record.status, AnchorStatus::Simulated);

    // same content rewritten, including trailing whitespace noise
    write_root(dir.path(), "abc\n");
    assert!(watcher.tick().await.unwrap().is_none());

    let history: Vec<_> = fs::read_dir(dir.path().join("anchors")).unwrap().collect();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn each_new_root_gets_its_own_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut watcher = RootWatcher::new(config(dir.path()), None);

    for root in ["r1", "r2", "r3"] {
        write_root(dir.path(), root);
        let record = watcher.tick().await.unwrap().unwrap();
        assert_eq!(record.root, root);
    }

    let history: Vec<_> = fs::read_dir(dir.path().join("anchors")).unwrap().collect();
    assert_eq!(history.len(), 3);
    assert_eq!(load_latest(dir.path()).unwrap().root, "r3");
}

#[tokio::test]
async fn restart_anchors_a_present_root_again() {
    let dir = tempfile::tempdir().unwrap();

    write_root(dir.path(), "abc");
    let mut first = RootWatcher::new(config(dir.path()), None);
    assert!(first.tick().await.unwrap().is_some());
    drop(first);

    // a fresh watcher has no last-seen hash, so the same root anchors once more
    let mut second = RootWatcher::new(config(dir.path()), None);
    assert_eq!(second.tick().await.unwrap().unwrap().root, "abc");
    assert!(second.tick().await.unwrap().is_none());

    let history: Vec<_> = fs::read_dir(dir.path().join("anchors")).unwrap().collect();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn external_backend_failure_is_still_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path());
    cfg.anchor_cmd = Some("false".into());
    let mut watcher = RootWatcher::new(cfg, None);

    write_root(dir.path(), "abc");
    let record = watcher.tick().await.unwrap().unwrap();
    assert_eq!(record.status, AnchorStatus::Error(1));
    assert_eq!(load_latest(dir.path()).unwrap().status, AnchorStatus::Error(1));
}
