//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory. The admin
//! session goes to the owner-only file vault so no keyring daemon is needed.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const PASSWORD: &str = "s3cret";

/// Fresh data directory configured for the file vault.
fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[session]\nvault = \"file\"\n").unwrap();
    dir
}

/// Run a CLI command in `data_dir` and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_eventline"))
        .args(args)
        .env("EVENTLINE_DATA_DIR", data_dir)
        .env("EVENTLINE_ADMIN_PASSWORD", PASSWORD)
        .env_remove("EVENTLINE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn list_events(data_dir: &Path) -> Vec<serde_json::Value> {
    let stdout = run_ok(data_dir, &["event", "list", "--json"]);
    serde_json::from_str(&stdout).expect("event list --json is not JSON")
}

fn add_gacha(data_dir: &Path) -> (String, String, i32) {
    run_cli(
        data_dir,
        &[
            "event",
            "add",
            "Limited Gacha",
            "--start",
            "2026-02-01",
            "--end",
            "2026-02-14",
            "--type",
            "gacha",
        ],
    )
}

#[test]
fn test_empty_schedule_shows_welcome() {
    let dir = data_dir();
    let events = list_events(dir.path());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Welcome to Endfield Schedule");

    let stdout = run_ok(
        dir.path(),
        &["timeline", "show", "--json", "--year", "2026", "--offset", "0"],
    );
    let frame: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(frame["period"]["totalDays"], 120);
    assert_eq!(frame["bars"][0]["eventId"], "1");
    assert_eq!(frame["weeks"][0]["label"], "1/5");
}

#[test]
fn test_timeline_show_text() {
    let dir = data_dir();
    let stdout = run_ok(
        dir.path(),
        &["timeline", "show", "--year", "2026", "--offset", "0", "--width", "1600"],
    );
    assert!(stdout.starts_with("2026/01 - 2026/04"));
    assert!(stdout.contains("Welcome"));
}

#[test]
fn test_timeline_rejects_bad_width() {
    let dir = data_dir();
    let (_, stderr, code) = run_cli(dir.path(), &["timeline", "show", "--width", "100"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_edit_requires_login() {
    let dir = data_dir();
    let (_, stderr, code) = add_gacha(dir.path());
    assert_eq!(code, 1);
    assert!(stderr.contains("admin login required"));
    assert_eq!(list_events(dir.path()).len(), 1);
}

#[test]
fn test_admin_add_edit_delete() {
    let dir = data_dir();
    run_ok(dir.path(), &["admin", "login", PASSWORD]);

    let (stdout, stderr, code) = add_gacha(dir.path());
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("Event created:"));
    assert!(stdout.contains("Last updated:"));

    let events = list_events(dir.path());
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["type"], "gacha");
    let id = events[1]["id"].as_str().unwrap().to_string();

    run_ok(
        dir.path(),
        &["event", "edit", &id, "--title", "Rerun Gacha", "--end", "2026-02-20"],
    );
    let events = list_events(dir.path());
    assert_eq!(events[1]["title"], "Rerun Gacha");
    assert_eq!(events[1]["endDate"], "2026-02-20");

    let filtered = run_ok(dir.path(), &["event", "list", "--json", "--filter", "gacha"]);
    let filtered: Vec<serde_json::Value> = serde_json::from_str(&filtered).unwrap();
    assert_eq!(filtered.len(), 1);

    run_ok(dir.path(), &["event", "move", "1", "0"]);
    assert_eq!(list_events(dir.path())[0]["id"], id.as_str());

    run_ok(dir.path(), &["event", "delete", &id]);
    assert_eq!(list_events(dir.path()).len(), 1);
}

#[test]
fn test_reversed_dates_rejected() {
    let dir = data_dir();
    run_ok(dir.path(), &["admin", "login", PASSWORD]);
    let (_, stderr, code) = run_cli(
        dir.path(),
        &[
            "event", "add", "Broken", "--start", "2026-03-10", "--end", "2026-03-01", "--type",
            "event",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("before start date"));
    assert_eq!(list_events(dir.path()).len(), 1);
}

#[test]
fn test_wrong_password_logs_out() {
    let dir = data_dir();
    run_ok(dir.path(), &["admin", "login", "wrong"]);
    assert!(run_ok(dir.path(), &["admin", "status"]).starts_with("admin"));

    let (_, stderr, code) = add_gacha(dir.path());
    assert_eq!(code, 1);
    assert!(stderr.contains("Unauthorized"));
    assert!(!dir.path().join("session.json").exists());
    assert!(run_ok(dir.path(), &["admin", "status"]).starts_with("anonymous"));
}

#[test]
fn test_move_rejected_while_filtered() {
    let dir = data_dir();
    run_ok(dir.path(), &["admin", "login", PASSWORD]);
    add_gacha(dir.path());
    run_ok(dir.path(), &["config", "set", "view.filter", "gacha"]);

    let (_, stderr, code) = run_cli(dir.path(), &["event", "move", "1", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("filter"));
}

#[test]
fn test_export_import_roundtrip() {
    let dir = data_dir();
    run_ok(dir.path(), &["admin", "login", PASSWORD]);
    add_gacha(dir.path());

    let export_path = dir.path().join("export.json");
    run_ok(dir.path(), &["data", "export", "--output", export_path.to_str().unwrap()]);
    let before = list_events(dir.path());

    run_ok(dir.path(), &["event", "delete", before[0]["id"].as_str().unwrap()]);
    run_ok(dir.path(), &["data", "import", export_path.to_str().unwrap()]);
    assert_eq!(list_events(dir.path()), before);
}

#[test]
fn test_import_rejects_non_array() {
    let dir = data_dir();
    run_ok(dir.path(), &["admin", "login", PASSWORD]);
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"events": []}"#).unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["data", "import", bad.to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not an array"));
    assert_eq!(list_events(dir.path()).len(), 1);
}

#[test]
fn test_timeline_nav_persists_window() {
    let dir = data_dir();
    let nav = |args: &[&str]| run_ok(dir.path(), args).trim().to_string();
    assert_eq!(nav(&["timeline", "nav", "set", "2026", "0"]), "2026/01 - 2026/04");
    assert_eq!(nav(&["timeline", "nav", "next"]), "2026/02 - 2026/05");
    assert_eq!(nav(&["timeline", "nav", "set", "2026", "-1"]), "2025/12 - 2026/03");
    assert_eq!(nav(&["config", "get", "view.month_offset"]), "-1");
}

#[test]
fn test_config_set_validates() {
    let dir = data_dir();
    run_ok(dir.path(), &["config", "set", "view.canvas_width", "2400"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "view.canvas_width"]).trim(), "2400");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "view.canvas_width", "100"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(dir.path(), &["config", "get", "view.nope"]);
    assert_eq!(code, 1);

    let listing = run_ok(dir.path(), &["config", "list"]);
    assert!(listing.contains("store.backend = local"));
    assert!(listing.contains("session.vault = file"));
}

#[cfg(unix)]
#[test]
fn test_session_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = data_dir();
    run_ok(dir.path(), &["admin", "login", PASSWORD]);
    let mode = std::fs::metadata(dir.path().join("session.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);

    run_ok(dir.path(), &["admin", "logout"]);
    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn test_event_show_prints_calendar_link() {
    let dir = data_dir();
    let stdout = run_ok(dir.path(), &["event", "show", "1"]);
    assert!(stdout.starts_with("Welcome to Endfield Schedule"));
    assert!(stdout.contains("2026/01/22 - 2026/02/10"));
    assert!(stdout.contains("action=TEMPLATE"));
    assert!(stdout.contains("dates=20260122%2F20260211"));

    let json = run_ok(dir.path(), &["event", "show", "1", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["id"], "1");
    assert!(value["calendarUrl"]
        .as_str()
        .unwrap()
        .contains("20260122%2F20260211"));

    let (_, stderr, code) = run_cli(dir.path(), &["event", "show", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("event not found"));
}
