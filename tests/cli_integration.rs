//! Integration tests for the `tb` CLI.
//!
//! Each test runs `tb` as a subprocess inside a temp directory, with the demo
//! board unless a seed file is written, and checks stdout and stderr.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Get the path to the built `tb` binary.
fn tb_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tb");
    path
}

fn tb_command(dir: &Path) -> Command {
    let mut cmd = Command::new(tb_bin());
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// Run `tb` with the given args in the given directory, returning (stdout, stderr, success).
fn run_tb(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = tb_command(dir).args(args).output().expect("failed to run tb");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tb` expecting success, return stdout.
fn run_tb_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tb(dir, args);
    if !success {
        panic!(
            "tb {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run a session: `script` is piped to stdin. Returns (stdout, stderr, success).
fn run_session(dir: &Path, args: &[&str], script: &str) -> (String, String, bool) {
    let mut child = tb_command(dir)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run tb");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

const SMALL_SEED: &str = r#"{
  "users": [
    {"id": "u1", "name": "Ada"},
    {"id": "u2", "name": "Linus"}
  ],
  "tasks": [
    {"id": "1", "title": "Write parser", "category": "Core", "status": "todo",
     "priority": "high", "progress": 0, "totalTasks": 4, "completedTasks": 0,
     "date": "1 Mar 2024", "assignees": ["u1"]},
    {"id": "2", "title": "Review parser", "category": "Core", "status": "inprogress",
     "priority": "medium", "progress": 50, "totalTasks": 2, "completedTasks": 1,
     "date": "2 Mar 2024", "assignees": ["u2", "ghost"]}
  ]
}"#;

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_default() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["list"]);
    assert!(out.contains("[ ] 1 Design new ui presentation"));
    assert!(out.contains("[x] 11 Make twitter banner"));
    assert!(out.ends_with("11 results\n"));
}

#[test]
fn test_list_search_is_case_insensitive() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["list", "--search", "WIREFRAME"]);
    assert!(out.contains("7 Create wireframe for ios app"));
    assert!(out.ends_with("1 results\n"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["list", "--json", "--priority", "low"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["results"], 3);
    let ids: Vec<&str> = parsed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["9", "10", "11"]);
}

#[test]
fn test_list_json_search_hits() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["list", "--json", "--search", "UI"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["activeFilters"], 0);
    let first = &parsed["tasks"][0];
    // "Design new ui presentation"
    assert_eq!(first["id"], "1");
    assert_eq!(first["hits"][0]["field"], "title");
    assert_eq!(first["hits"][0]["spans"], serde_json::json!([[11, 13]]));
}

#[test]
fn test_board_json_search_hits_and_filter_count() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(
        tmp.path(),
        &["board", "--json", "--search", "oreo", "--status", "inprogress", "--assignee", "sarah"],
    );
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["activeFilters"], 2);
    assert_eq!(parsed["results"], 3);
    let tasks = parsed["columns"][1]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().all(|t| t["hits"][0]["field"] == "category"));
}

#[test]
fn test_list_text_shows_filter_count() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["list", "--status", "todo", "--status", "done"]);
    assert!(out.ends_with("7 results \u{00b7} 2 filters\n"));
}

#[test]
fn test_counts() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["counts", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["all"], 11);
    assert_eq!(parsed["todo"], 4);
    assert_eq!(parsed["inprogress"], 4);
    assert_eq!(parsed["done"], 3);
}

#[test]
fn test_board_headers_use_board_counts() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["board", "--search", "twitter"]);
    assert!(out.contains("== To do (4) =="));
    assert!(out.contains("== In progress (4) =="));
    assert!(out.contains("== Done (3) =="));
    assert!(out.ends_with("2 results\n"));
}

#[test]
fn test_board_wide() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["board", "--wide", "--width", "20"]);
    let first = out.lines().next().unwrap();
    assert!(first.starts_with("To do (4)"));
    assert!(first.contains(" \u{2502} In progress (4)"));
}

#[test]
fn test_show_unknown_task_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tb(tmp.path(), &["show", "99"]);
    assert!(!success);
    assert!(stderr.contains("task not found: 99"));
}

#[test]
fn test_users() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["users"]);
    assert_eq!(out, "1 Vincent\n2 Sarah\n3 John\n4 Emma\n");
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_mv_reports_new_column() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["mv", "5", "done"]);
    assert_eq!(out, "Moved 5 to Done\n");
}

#[test]
fn test_mv_unknown_task_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (stdout, stderr, success) = run_tb(tmp.path(), &["mv", "ghost", "done"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("not found"));
}

#[test]
fn test_mv_bad_status_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tb(tmp.path(), &["mv", "5", "blocked"]);
    assert!(!success);
    assert!(stderr.contains("unknown status 'blocked'"));
}

#[test]
fn test_dup_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["dup", "9", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["id"], "12");
    assert_eq!(parsed["title"], "Add product to the market (Copy)");
    assert_eq!(parsed["status"], "todo");
    assert_eq!(parsed["progress"], 0);
    assert_eq!(parsed["completedTasks"], 0);
    assert_eq!(parsed["priority"], "low");
}

#[test]
fn test_progress_rounds() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tb_ok(tmp.path(), &["progress", "4", "7"]);
    assert_eq!(out, "4: 7/14 (50%)\n");
}

// ---------------------------------------------------------------------------
// Session tests
// ---------------------------------------------------------------------------

#[test]
fn test_session_state_persists_across_lines() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (stdout, stderr, success) = run_session(
        tmp.path(),
        &[],
        "add \"Ship it\" --status done\nmv 99 todo\ncounts\n",
    );
    assert!(success);
    assert!(stdout.contains("Added 12: Ship it"));
    assert!(stdout.contains("All 12 \u{00b7} To do 4 \u{00b7} In progress 4 \u{00b7} Done 4"));
    assert!(stderr.contains("error: task not found: 99"));
}

#[test]
fn test_session_drag_and_drop() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (stdout, _, success) = run_session(
        tmp.path(),
        &[],
        "drag start 3\ndrag over done\ndrag drop done\nshow 3\n",
    );
    assert!(success);
    assert!(stdout.contains("drag: dragging 3 (over done)"));
    assert!(stdout.contains("Moved 3 to done"));
    assert!(stdout.contains("status: done (Done)"));
}

#[test]
fn test_session_drop_outside_changes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (stdout, _, success) = run_session(
        tmp.path(),
        &["--json"],
        "drag start 3\ndrag drop\ncounts\n",
    );
    assert!(success);
    assert!(stdout.contains("\"todo\": 4"));
    assert!(stdout.contains("\"done\": 3"));
}

// ---------------------------------------------------------------------------
// Config and seed
// ---------------------------------------------------------------------------

#[test]
fn test_config_file_in_cwd() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(
        tmp.path().join("board.toml"),
        r#"[board]
name = "Team board"

[defaults]
priority = "high"

[columns]
todo = "Backlog"
"#,
    )
    .unwrap();

    let out = run_tb_ok(tmp.path(), &["counts"]);
    assert!(out.contains("Backlog 4"));

    let out = run_tb_ok(tmp.path(), &["board", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["name"], "Team board");
    assert_eq!(parsed["columns"][0]["title"], "Backlog");

    let out = run_tb_ok(tmp.path(), &["add", "New", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["priority"], "high");
    assert_eq!(parsed["totalTasks"], 10);
}

#[test]
fn test_explicit_config_missing_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tb(tmp.path(), &["--config", "nope.toml", "counts"]);
    assert!(!success);
    assert!(stderr.contains("nope.toml"));
}

#[test]
fn test_bad_config_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("board.toml"), "[defaults]\nstatus = \"blocked\"\n").unwrap();
    let (_, stderr, success) = run_tb(tmp.path(), &["counts"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_seed_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("seed.json"), SMALL_SEED).unwrap();

    let out = run_tb_ok(tmp.path(), &["--seed", "seed.json", "list", "--assignee", "linus"]);
    assert!(out.contains("[>] 2 Review parser (Core) medium 50% @Linus"));
    assert!(out.ends_with("1 results \u{00b7} 1 filter\n"));

    // the unknown assignee was dropped at load
    let out = run_tb_ok(tmp.path(), &["--seed", "seed.json", "show", "2", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["assignees"].as_array().unwrap().len(), 1);

    let out = run_tb_ok(tmp.path(), &["--seed", "seed.json", "add", "Next"]);
    assert_eq!(out, "Added 3: Next\n");
}

#[test]
fn test_seed_duplicate_ids_fail() {
    let tmp = tempfile::TempDir::new().unwrap();
    let seed = r#"{"tasks": [
      {"id": "1", "title": "a", "category": "", "status": "todo", "priority": "low",
       "progress": 0, "totalTasks": 1, "completedTasks": 0, "date": ""},
      {"id": "1", "title": "b", "category": "", "status": "todo", "priority": "low",
       "progress": 0, "totalTasks": 1, "completedTasks": 0, "date": ""}
    ]}"#;
    fs::write(tmp.path().join("seed.json"), seed).unwrap();
    let (_, stderr, success) = run_tb(tmp.path(), &["--seed", "seed.json", "counts"]);
    assert!(!success);
    assert!(stderr.contains("duplicate task id: 1"));
}

#[test]
fn test_seed_file_is_not_modified() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("seed.json");
    fs::write(&path, SMALL_SEED).unwrap();
    run_tb_ok(tmp.path(), &["--seed", "seed.json", "mv", "1", "done"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), SMALL_SEED);
}
