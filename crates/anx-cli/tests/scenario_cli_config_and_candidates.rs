//! `anx config-hash` / `anx candidates`
//!
//! GREEN when:
//! - config-hash prints a 64-hex hash followed by the canonical JSON, and
//!   the hash does not depend on key order.
//! - candidates prints only the requested leg's baggage options.
//! - With `pbod_leg_fallback: false` in config, a PBOD carried by another
//!   leg is no longer offered.
//! - An unknown category is rejected by argument parsing.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const CATALOG: &str = r#"[
  {
    "legFlightNumber": "FD3435",
    "services": [
      { "ssrCode": "BG20", "description": "20 kg", "amount": 467.29, "currency": "THB" },
      { "ssrCode": "PBOD", "description": "Priority boarding", "amount": 99, "currency": "THB" }
    ]
  },
  {
    "legFlightNumber": "FD3436",
    "services": [
      { "ssrCode": "BG25", "description": "25 kg", "amount": 520, "currency": "THB" }
    ]
  }
]"#;

fn write(dir: &TempDir, name: &str, body: &str) -> String {
    let p = dir.path().join(name);
    fs::write(&p, body).unwrap();
    p.to_string_lossy().to_string()
}

fn anx() -> Command {
    let mut cmd = Command::cargo_bin("anx").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn hash_line(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

#[test]
fn config_hash_is_key_order_independent() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.yaml", "catalog:\n  pbod_leg_fallback: true\nreconcile:\n  none_label: \"-\"\n");
    let b = write(&dir, "b.yaml", "reconcile:\n  none_label: \"-\"\ncatalog:\n  pbod_leg_fallback: true\n");

    let out_a = anx().args(["config-hash", &a]).output().unwrap();
    let out_b = anx().args(["config-hash", &b]).output().unwrap();
    assert!(out_a.status.success());

    let line = hash_line(&out_a.stdout);
    let hash = line.strip_prefix("config_hash=").unwrap();
    assert_eq!(hash.len(), 64);
    assert_eq!(line, hash_line(&out_b.stdout));
}

#[test]
fn candidates_for_one_leg() {
    let dir = TempDir::new().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);

    let out = anx()
        .args(["candidates", "--catalog", &catalog, "--flight", "FD3435", "--category", "baggage"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: Value = serde_json::from_slice(&out.stdout).unwrap();
    let codes: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["option"]["code"].as_str())
        .collect();
    assert_eq!(codes, ["BG20"]);
}

#[test]
fn pbod_fallback_follows_config() {
    let dir = TempDir::new().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);
    let strict = write(&dir, "strict.yaml", "catalog:\n  pbod_leg_fallback: false\n");

    anx()
        .args(["candidates", "--catalog", &catalog, "--flight", "FD3436", "--category", "PRIORITY_BOARDING"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PBOD"));

    anx()
        .args([
            "candidates", "--catalog", &catalog, "--flight", "FD3436",
            "--category", "PRIORITY_BOARDING", "--config", &strict,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PBOD").not());
}

#[test]
fn unknown_category_is_rejected() {
    let dir = TempDir::new().unwrap();
    let catalog = write(&dir, "catalog.json", CATALOG);
    anx()
        .args(["candidates", "--catalog", &catalog, "--category", "lounge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}
