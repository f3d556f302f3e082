//! CLI integration tests
//!
//! Run the `cubehub` binary against a temp database. No test reaches the
//! network: external base URLs point at a closed local port.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use chrono::{TimeZone, Utc};
use cubehub_core::model::{Card, Cube};
use cubehub_core::storage::CubeStorage;
use cubehub_store::SqliteCubeStore;
use rusqlite::Connection;
use tempfile::TempDir;

const CLOSED_PORT: &str = "http://127.0.0.1:9";

fn seed_db(temp_dir: &TempDir) -> PathBuf {
    let db_path = temp_dir.path().join("cubes.db");
    let store = SqliteCubeStore::open(&db_path).unwrap();
    let cards = vec![
        Card::new("bolt", "Lightning Bolt"),
        Card::new("ancestral", "Ancestral Recall"),
    ];
    store.upsert_cards(&cards).unwrap();
    let mut with_repeat = cards.clone();
    with_repeat.push(cards[0].clone());
    store
        .update_cube(&Cube {
            id: "vintage".to_string(),
            name: "Vintage Cube".to_string(),
            version_number: 0,
            cards: with_repeat,
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        })
        .unwrap();
    db_path
}

fn run(dir: &Path, db: &Path, args: &[&str]) -> Output {
    run_with_env(dir, db, &[], args)
}

/// Like `run`, with extra environment variables set after the key is cleared
fn run_with_env(dir: &Path, db: &Path, envs: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cubehub"))
        .current_dir(dir)
        .env_remove("OPENAI_API_KEY")
        .envs(envs.iter().copied())
        .env("RUST_LOG", "off")
        .args(["--db", db.to_str().unwrap()])
        .args(["--scryfall-url", CLOSED_PORT, "--cubecobra-url", CLOSED_PORT])
        .args(["--timeout-secs", "2"])
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_show_prints_latest_version_with_counts() {
    let temp_dir = TempDir::new().unwrap();
    let db = seed_db(&temp_dir);

    let output = run(temp_dir.path(), &db, &["show", "vintage"]);

    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vintage Cube (vintage)"));
    assert!(stdout.contains("version: 0"));
    assert!(stdout.contains("2x Lightning Bolt [bolt]"));
    assert!(stdout.contains("1x Ancestral Recall [ancestral]"));
}

#[test]
fn test_show_json_output_parses() {
    let temp_dir = TempDir::new().unwrap();
    let db = seed_db(&temp_dir);

    let output = run(
        temp_dir.path(),
        &db,
        &["show", "vintage", "--version", "0", "--json"],
    );

    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["version"], 0);
    assert_eq!(summary["distinct"], 2);
    assert_eq!(summary["total"], 3);
}

#[test]
fn test_show_unknown_version_fails_with_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let db = seed_db(&temp_dir);

    let output = run(temp_dir.path(), &db, &["show", "vintage", "--version", "4"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_NOT_FOUND"), "stderr: {}", stderr);
}

#[test]
fn test_load_with_unreachable_manifest_commits_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("fresh").join("cubes.db");

    let output = run(temp_dir.path(), &db, &["load", "vintage"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("build_cube"), "stderr: {}", stderr);
    assert!(stderr.contains("fetch_manifest"), "stderr: {}", stderr);

    let conn = Connection::open(&db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM cube_versions", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_read_card_requires_api_key() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("cubes.db");

    let output = run(
        temp_dir.path(),
        &db,
        &["read-card", "https://img.example/custom.png"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_INVALID_INPUT"), "stderr: {}", stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "stderr: {}", stderr);
}

/// API key and base URL that reach nothing
const UNREACHABLE_OPENAI: [(&str, &str); 2] = [
    ("OPENAI_API_KEY", "sk-test"),
    ("OPENAI_BASE_URL", CLOSED_PORT),
];

#[test]
fn test_read_card_never_creates_database() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join(".cubehub").join("cubes.db");

    let output = run_with_env(
        temp_dir.path(),
        &db,
        &UNREACHABLE_OPENAI,
        &["read-card", "https://img.example/custom.png"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_EXTERNAL_SERVICE"), "stderr: {}", stderr);
    assert!(!db.exists());
    assert!(!temp_dir.path().join(".cubehub").exists());
}

#[test]
fn test_read_deck_requires_api_key() {
    let temp_dir = TempDir::new().unwrap();
    let db = seed_db(&temp_dir);

    let output = run(
        temp_dir.path(),
        &db,
        &["read-deck", "vintage", "https://img.example/deck.jpg", "--player-id", "p1"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_INVALID_INPUT"), "stderr: {}", stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "stderr: {}", stderr);
}

#[test]
fn test_read_deck_with_unreachable_classifier_records_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db = seed_db(&temp_dir);

    let output = run_with_env(
        temp_dir.path(),
        &db,
        &UNREACHABLE_OPENAI,
        &[
            "read-deck",
            "vintage",
            "https://img.example/deck.jpg",
            "--player-id",
            "p1",
            "--version",
            "0",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("read_deck"), "stderr: {}", stderr);

    let conn = Connection::open(&db).unwrap();
    for table in ["players", "decks"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0, "{} should be empty", table);
    }
}

#[test]
fn test_read_deck_unknown_cube_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let db = seed_db(&temp_dir);

    let output = run_with_env(
        temp_dir.path(),
        &db,
        &UNREACHABLE_OPENAI,
        &["read-deck", "legacy", "https://img.example/deck.jpg", "--player-id", "p1"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_NOT_FOUND"), "stderr: {}", stderr);
}
