//! CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_streakroom-cli"))
        .args(args)
        .env("STREAKROOM_DATA_DIR", data_dir)
        .env("STREAKROOM_LOG", "off")
        .env_remove("STREAKROOM_API_KEY")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
    stdout
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let stdout = run_cli_success(data_dir, args);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_record_add_updates_stats() {
    let dir = TempDir::new().unwrap();

    let events = run_json(dir.path(), &["record", "add", "--mood", "4", "--note", "walk"]);
    let events = events.as_array().unwrap();
    assert_eq!(events[0]["type"], "CheckInRecorded");
    assert!(events
        .iter()
        .any(|e| e["type"] == "AchievementUnlocked" && e["id"] == "first_step"));

    let stats = run_json(dir.path(), &["stats", "show"]);
    assert_eq!(stats["totalCount"], 1);
    assert_eq!(stats["todayCount"], 1);
    assert_eq!(stats["streak"], 1);
}

#[test]
fn test_invalid_mood_fails_without_writing() {
    let dir = TempDir::new().unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["record", "add", "--mood", "7"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let records = run_json(dir.path(), &["record", "list"]);
    assert_eq!(records.as_array().unwrap().len(), 0);
}

#[test]
fn test_record_delete_and_clear() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["record", "add"]);
    run_cli_success(dir.path(), &["record", "add", "--mood", "2"]);

    let records = run_json(dir.path(), &["record", "list"]);
    let id = records[0]["id"].as_i64().unwrap().to_string();
    let events = run_json(dir.path(), &["record", "delete", &id]);
    assert_eq!(events[0]["type"], "CheckInDeleted");

    let (_, _, code) = run_cli(dir.path(), &["record", "clear"]);
    assert_ne!(code, 0, "clear without --yes must refuse");

    let event = run_json(dir.path(), &["record", "clear", "--yes"]);
    assert_eq!(event["type"], "DataCleared");
    assert_eq!(event["records_removed"], 1);
}

#[test]
fn test_achievement_list_has_full_catalog() {
    let dir = TempDir::new().unwrap();
    let list = run_json(dir.path(), &["achievement", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 28);

    let unlocked = run_json(dir.path(), &["achievement", "list", "--unlocked"]);
    assert!(unlocked.as_array().unwrap().is_empty());
}

#[test]
fn test_friends_start_with_demo_entries() {
    let dir = TempDir::new().unwrap();
    let friends = run_json(dir.path(), &["friend", "list"]);
    assert_eq!(friends.as_array().unwrap().len(), 4);

    let board = run_json(dir.path(), &["friend", "leaderboard", "--by", "week"]);
    assert_eq!(board.as_array().unwrap().len(), 5);
}

#[test]
fn test_goal_set_defaults_weekly() {
    let dir = TempDir::new().unwrap();
    let event = run_json(dir.path(), &["goal", "set", "2"]);
    assert_eq!(event["type"], "GoalUpdated");
    assert_eq!(event["weekly_goal"], 14);

    let (_, _, code) = run_cli(dir.path(), &["goal", "set", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_get_roundtrip() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["config", "set", "advisor.model", "gpt-4o-mini"]).trim(), "ok");
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "advisor.model"]).trim(),
        "gpt-4o-mini"
    );

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_export_csv_to_stdout() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["record", "add", "--mood", "5", "--note", "a, b"]);
    let csv = run_cli_success(dir.path(), &["export", "csv", "--stdout"]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,time,mood,note,duration_min,image");
    assert!(lines[1].contains(",5,\"a, b\",0,"));
}

#[test]
fn test_advice_falls_back_when_advisor_disabled() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "advisor.enabled", "false"]);
    let advice = run_cli_success(dir.path(), &["advice", "daily"]);
    assert!(!advice.trim().is_empty());

    let analysis = run_json(dir.path(), &["advice", "analyze"]);
    assert!(analysis["suggestions"].is_array());
}

#[test]
fn test_distribution_days_out_of_range_rejected() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["stats", "hourly", "--days", "200000000"]);
    assert_ne!(code, 0);
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "stats.rolling_window_days", "200000000"]);
    assert_eq!(code, 1);

    let dist = run_json(dir.path(), &["stats", "weekday", "--days", "3650"]);
    assert_eq!(dist["counts"].as_array().unwrap().len(), 7);
}
