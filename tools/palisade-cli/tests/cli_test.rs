use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn palisade() -> Command {
    Command::cargo_bin("palisade").unwrap()
}

#[test]
fn keygen_writes_hex_seed() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("node.key");

    palisade()
        .args(["keygen", key_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Public key (hex):"));

    let seed = fs::read_to_string(&key_path).unwrap();
    let seed = seed.trim();
    assert_eq!(seed.len(), 64);
    assert!(seed.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn mint_then_inspect_verifies() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("node.key");

    let keygen = palisade()
        .args(["keygen", key_path.to_str().unwrap()])
        .assert()
        .success();
    let keygen_out = String::from_utf8(keygen.get_output().stdout.clone()).unwrap();
    let pubkey_hex = keygen_out
        .lines()
        .find_map(|line| line.strip_prefix("Public key (hex): "))
        .unwrap()
        .to_string();

    let mint = palisade()
        .args([
            "capability",
            "--key",
            key_path.to_str().unwrap(),
            "--subject",
            "guardian-1",
            "--scope",
            "infrastructure:write",
        ])
        .assert()
        .success();
    let token = String::from_utf8(mint.get_output().stdout.clone())
        .unwrap()
        .trim()
        .to_string();

    palisade()
        .args(["inspect", &token, "--pubkey", &pubkey_hex])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token is valid"))
        .stdout(predicate::str::contains("\"sub\": \"guardian-1\""));
}

#[test]
fn inspect_with_wrong_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("node.key");
    let other_path = dir.path().join("other.key");

    palisade()
        .args(["keygen", key_path.to_str().unwrap()])
        .assert()
        .success();
    let other = palisade()
        .args(["keygen", other_path.to_str().unwrap()])
        .assert()
        .success();
    let other_out = String::from_utf8(other.get_output().stdout.clone()).unwrap();
    let other_pubkey = other_out
        .lines()
        .find_map(|line| line.strip_prefix("Public key (hex): "))
        .unwrap()
        .to_string();

    let mint = palisade()
        .args([
            "capability",
            "--key",
            key_path.to_str().unwrap(),
            "--subject",
            "guardian-1",
        ])
        .assert()
        .success();
    let token = String::from_utf8(mint.get_output().stdout.clone())
        .unwrap()
        .trim()
        .to_string();

    palisade()
        .args(["inspect", &token, "--pubkey", &other_pubkey])
        .assert()
        .failure()
        .stderr(predicate::str::contains("verification failed"));
}

#[test]
fn hmac_mint_and_verify() {
    let mint = palisade()
        .args([
            "capability",
            "--hmac-secret",
            "a-strong-test-secret",
            "--subject",
            "guardian-2",
            "--audience",
            "other-portal",
        ])
        .assert()
        .success();
    let token = String::from_utf8(mint.get_output().stdout.clone())
        .unwrap()
        .trim()
        .to_string();

    palisade()
        .args([
            "inspect",
            &token,
            "--hmac-secret",
            "a-strong-test-secret",
            "--audience",
            "other-portal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token is valid"));

    // wrong audience is rejected even with the right secret
    palisade()
        .args(["inspect", &token, "--hmac-secret", "a-strong-test-secret"])
        .assert()
        .failure();
}

#[test]
fn capability_without_key_material_fails() {
    palisade()
        .args(["capability", "--subject", "guardian-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--key or --hmac-secret"));
}

#[test]
fn canonicalize_sorts_keys() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("in.json");
    fs::write(&file, r#"{ "b": 1, "a": { "z": true, "y": null } }"#).unwrap();

    palisade()
        .args(["canonicalize", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::eq(r#"{"a":{"y":null,"z":true},"b":1}"#));
}

#[test]
fn canonicalize_rejects_floats() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("in.json");
    fs::write(&file, r#"{"ratio": 0.5}"#).unwrap();

    palisade()
        .args(["canonicalize", file.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn hash_is_stable_across_key_order() {
    let dir = tempfile::tempdir().unwrap();
    let one = dir.path().join("one.json");
    let two = dir.path().join("two.json");
    fs::write(&one, r#"{"a": 1, "b": 2}"#).unwrap();
    fs::write(&two, r#"{"b": 2, "a": 1}"#).unwrap();

    let first = palisade()
        .args(["hash", one.to_str().unwrap()])
        .assert()
        .success();
    let second = palisade()
        .args(["hash", two.to_str().unwrap()])
        .assert()
        .success();

    let first = String::from_utf8(first.get_output().stdout.clone()).unwrap();
    let second = String::from_utf8(second.get_output().stdout.clone()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.trim().len(), 64);
}

#[test]
fn missing_file_reports_path() {
    palisade()
        .args(["hash", "/no/such/file.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/no/such/file.json"));
}
