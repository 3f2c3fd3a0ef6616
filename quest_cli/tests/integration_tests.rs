//! Integration tests for the quest binary.
//!
//! These tests verify end-to-end behavior including:
//! - Goal creation and event recording across invocations
//! - Score and level reporting
//! - Save/load of ledger files
//! - Event journal and CSV rollup
//! - The interactive menu

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from any user config
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("quest").expect("Failed to find quest binary");
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn create_sample_goals(data_dir: &Path) {
    cli(data_dir)
        .args(["create", "simple", "--name", "Marathon"])
        .args(["--description", "Run a marathon", "--points", "1000"])
        .assert()
        .success();
    cli(data_dir)
        .args(["create", "eternal", "--name", "Scriptures"])
        .args(["--description", "Read daily", "--points", "100"])
        .assert()
        .success();
    cli(data_dir)
        .args(["create", "checklist", "--name", "Temple"])
        .args(["--description", "Attend", "--points", "50"])
        .args(["--target", "3", "--bonus", "500"])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Eternal Quest goal tracker"));
}

#[test]
fn test_create_writes_ledger_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    create_sample_goals(data_dir);

    let contents = fs::read_to_string(data_dir.join("goals.txt")).expect("Failed to read ledger");
    assert_eq!(
        contents,
        "0\n\
         SimpleGoal:Marathon,Run a marathon,1000,False\n\
         EternalGoal:Scriptures,Read daily,100\n\
         ChecklistGoal:Temple,Attend,50,3,500,0\n"
    );
}

#[test]
fn test_names_and_details() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    create_sample_goals(data_dir);

    cli(data_dir)
        .arg("names")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Marathon"))
        .stdout(predicate::str::contains("3. Temple"));

    cli(data_dir)
        .arg("details")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [ ] Marathon (Run a marathon)"))
        .stdout(predicate::str::contains(
            "3. [ ] Temple (Attend) -- Currently completed: [                    ] 0/3",
        ));
}

#[test]
fn test_empty_ledger_listing() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("names")
        .assert()
        .success()
        .stdout(predicate::str::contains("You have no goals yet."));
}

#[test]
fn test_record_updates_score_and_level() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    create_sample_goals(data_dir);

    cli(data_dir)
        .args(["record", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You have earned 1000 points!"))
        .stdout(predicate::str::contains("Level 3!"));

    cli(data_dir)
        .args(["record", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already completed this goal"));

    cli(data_dir)
        .arg("score")
        .assert()
        .success()
        .stdout(predicate::str::contains("You have 1000 points."));

    cli(data_dir)
        .arg("level")
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 3!"));
}

#[test]
fn test_checklist_bonus_across_invocations() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    create_sample_goals(data_dir);

    for _ in 0..2 {
        cli(data_dir).args(["record", "3"]).assert().success();
    }
    cli(data_dir)
        .args(["record", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plus a bonus of 500 points"));

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("You have 650 points."))
        .stdout(predicate::str::contains("Level 2!"));

    cli(data_dir)
        .arg("details")
        .assert()
        .success()
        .stdout(predicate::str::contains("3. [X] Temple"));
}

#[test]
fn test_record_out_of_range_fails_without_changes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    create_sample_goals(data_dir);
    let before = fs::read_to_string(data_dir.join("goals.txt")).unwrap();

    for index in ["0", "4"] {
        cli(data_dir)
            .args(["record", index])
            .assert()
            .failure()
            .stderr(predicate::str::contains("OutOfRange"));
    }

    let after = fs::read_to_string(data_dir.join("goals.txt")).unwrap();
    assert_eq!(before, after);
    assert!(!data_dir.join("events.jsonl").exists());
}

#[test]
fn test_create_rejects_invalid_input() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["create", "checklist", "--name", "Temple", "--points", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInput"));

    cli(data_dir)
        .args(["create", "weekly", "--name", "Gym", "--points", "50"])
        .assert()
        .failure();

    cli(data_dir)
        .args(["create", "simple", "--name", "Gym", "--points", "fifty"])
        .assert()
        .failure();

    assert!(!data_dir.join("goals.txt").exists());
}

#[test]
fn test_save_and_load_round_trip() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let backup = data_dir.join("backup/quest.txt");

    create_sample_goals(data_dir);
    cli(data_dir).args(["record", "2"]).assert().success();

    cli(data_dir)
        .arg("save")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Goals saved"));

    // Diverge the working ledger, then restore from the backup
    cli(data_dir).args(["record", "2"]).assert().success();
    cli(data_dir)
        .arg("load")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 goals"))
        .stdout(predicate::str::contains("You have 100 points."));

    assert_eq!(
        fs::read_to_string(data_dir.join("goals.txt")).unwrap(),
        fs::read_to_string(&backup).unwrap()
    );
}

#[test]
fn test_load_starts_a_fresh_journal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let backup = data_dir.join("backup.txt");

    create_sample_goals(data_dir);
    cli(data_dir).arg("save").arg(&backup).assert().success();
    cli(data_dir).args(["record", "2"]).assert().success();
    cli(data_dir).args(["record", "2"]).assert().success();

    cli(data_dir)
        .arg("load")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archived 2 earlier events"));

    assert!(!data_dir.join("events.jsonl").exists());
    let csv = fs::read_to_string(data_dir.join("events.csv")).unwrap();
    assert_eq!(csv.lines().count(), 3);

    cli(data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No events recorded yet."));

    cli(data_dir).args(["record", "2"]).assert().success();
    cli(data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("score 100"))
        .stdout(predicate::str::contains("score 200").not());
}

#[test]
fn test_history_lists_recorded_events() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No events recorded yet."));

    create_sample_goals(data_dir);
    cli(data_dir).args(["record", "2"]).assert().success();
    cli(data_dir).args(["record", "3"]).assert().success();

    let journal = fs::read_to_string(data_dir.join("events.jsonl")).unwrap();
    assert_eq!(journal.lines().count(), 2);
    let first: serde_json::Value = serde_json::from_str(journal.lines().next().unwrap()).unwrap();
    assert_eq!(first["goal_name"], "Scriptures");
    assert_eq!(first["goal_kind"], "eternal");
    assert_eq!(first["points"], 100);

    cli(data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("#2 Scriptures  +100  score 100"))
        .stdout(predicate::str::contains("#3 Temple  +50  score 150"));
}

#[test]
fn test_rollup_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to roll up"));

    create_sample_goals(data_dir);
    for _ in 0..3 {
        cli(data_dir).args(["record", "2"]).assert().success();
    }

    cli(data_dir)
        .args(["rollup", "--cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 3 events"));

    let csv = fs::read_to_string(data_dir.join("events.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(!data_dir.join("events.jsonl").exists());
    assert!(!data_dir.join("events.jsonl.processed").exists());
}

#[test]
fn test_menu_session() {
    let temp_dir = setup_test_dir();
    let save_path = temp_dir.path().join("menu.txt");

    let script = format!(
        "1\n2\nScriptures\nRead daily\n100\n6\n1\n4\n{}\n7\n",
        save_path.display()
    );

    cli(temp_dir.path())
        .arg("menu")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Menu Options:"))
        .stdout(predicate::str::contains("You have earned 100 points!"))
        .stdout(predicate::str::contains("Goals saved successfully!"));

    assert_eq!(
        fs::read_to_string(&save_path).unwrap(),
        "100\nEternalGoal:Scriptures,Read daily,100\n"
    );
}

#[test]
fn test_default_command_is_menu() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .write_stdin("7\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Select a choice from the menu"));
}
