//! CLI integration tests
//!
//! Drive the built binary against a scratch database and check both its
//! output and what lands in the tables.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(temp_dir: &TempDir, db_path: &Path, args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_fitdesk-cli");
    Command::new(cli_bin)
        .current_dir(temp_dir.path())
        .arg("--db")
        .arg(db_path)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn setup_store(temp_dir: &TempDir) -> PathBuf {
    let db_path = temp_dir.path().join("data").join("fitdesk.db");
    let output = run(temp_dir, &db_path, &["schema", "init"]);
    assert!(
        output.status.success(),
        "schema init should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    db_path
}

#[test]
fn test_cli_add_and_show_client() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_store(&temp_dir);

    let output = run(
        &temp_dir,
        &db_path,
        &[
            "user", "add-client", "--name", "ana", "--email", "ana@gym", "--password", "s3cret",
            "--plan", "gold",
        ],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("Saved client 1"));

    let output = run(&temp_dir, &db_path, &["user", "show", "1"]);
    assert!(output.status.success());
    let shown = stdout(&output);
    assert!(shown.contains("\"userName\": \"ana\""));
    assert!(shown.contains("\"plan\": \"gold\""));
    assert!(!shown.contains("s3cret"), "password must not be printed");

    let conn = Connection::open(&db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_cli_rejects_taken_user_name() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_store(&temp_dir);
    let add = [
        "user", "add-client", "--name", "bo", "--email", "bo@gym", "--password", "pw",
    ];

    assert!(run(&temp_dir, &db_path, &add).status.success());
    let output = run(&temp_dir, &db_path, &add);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is taken"));

    let output = run(&temp_dir, &db_path, &["user", "check-name", "bo"]);
    assert!(stdout(&output).contains("bo is taken"));
}

#[test]
fn test_cli_profile_set_and_show() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_store(&temp_dir);
    run(
        &temp_dir,
        &db_path,
        &["user", "add-client", "--name", "cy", "--email", "cy@gym", "--password", "pw"],
    );

    let output = run(&temp_dir, &db_path, &["profile", "set", "1", "general", "Age", "34"]);
    assert!(
        output.status.success(),
        "Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let output = run(&temp_dir, &db_path, &["profile", "set", "1", "additional", "goal", "marathon"]);
    assert!(output.status.success());

    let output = run(&temp_dir, &db_path, &["profile", "show", "1"]);
    let shown = stdout(&output);
    assert!(shown.contains("General.Age = 34"));
    assert!(shown.contains("Additional.goal = marathon"));
}

#[test]
fn test_cli_profile_out_of_range_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_store(&temp_dir);

    let output = run(&temp_dir, &db_path, &["profile", "set", "1", "General", "Age", "300"]);
    assert!(!output.status.success());

    let output = run(&temp_dir, &db_path, &["profile", "set", "1", "Posture", "Age", "30"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown profile category"));
}

#[test]
fn test_cli_prefs_and_delete() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = setup_store(&temp_dir);
    run(
        &temp_dir,
        &db_path,
        &["user", "add-client", "--name", "di", "--email", "di@gym", "--password", "pw"],
    );

    let output = run(
        &temp_dir,
        &db_path,
        &["prefs", "set", "1", "--mute", "true", "--connect", "11,13"],
    );
    assert!(output.status.success());
    let shown = stdout(&run(&temp_dir, &db_path, &["prefs", "show", "1"]));
    assert!(shown.contains("\"mute\": true"));

    let output = run(&temp_dir, &db_path, &["user", "delete", "1"]);
    assert!(output.status.success());
    let output = run(&temp_dir, &db_path, &["user", "show", "1"]);
    assert!(!output.status.success());
    let output = run(&temp_dir, &db_path, &["prefs", "show", "1"]);
    assert!(!output.status.success());
}
