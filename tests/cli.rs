use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn roster() -> Command {
    Command::cargo_bin("shift_roster").unwrap()
}

#[test]
fn generate_writes_schedule_and_report() {
    let dir = tempdir().unwrap();
    let workers = dir.path().join("team_workers.json");
    fs::write(
        &workers,
        r#"["Ana", "Ben", "Cho", "Dev", "Eli", "Fay", "Gus", "Hal"]"#,
    )
    .unwrap();
    let out = dir.path().join("schedule.json");

    roster()
        .args(["generate", "--seed", "5", "--start-date", "2024-03-02", "--out"])
        .arg(&out)
        .arg(&workers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extra staffing days for 12pm-10pm shift are on:"))
        .stdout(predicate::str::contains("Worker: Hal"))
        .stdout(predicate::str::contains("ERROR").not());

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(raw["0"]["0"]["date"], "2024-03-02");
    assert_eq!(raw.as_object().unwrap().len(), 4);

    // the written schedule seeds the next run and passes the audit
    roster()
        .args(["check", "--schedule"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn infeasible_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let workers = dir.path().join("workers.json");
    fs::write(&workers, r#"["Solo"]"#).unwrap();
    let out = dir.path().join("schedule.json");

    roster()
        .args(["generate", "--seed", "1", "--weeks", "1", "--out"])
        .arg(&out)
        .arg(&workers)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("No feasible solution found."));
    assert!(!out.exists());
}

#[test]
fn malformed_previous_schedule_fails_fast() {
    let dir = tempdir().unwrap();
    let previous = dir.path().join("last_month.json");
    fs::write(&previous, r#"{"0": "not a week"}"#).unwrap();
    let out = dir.path().join("schedule.json");

    roster()
        .args(["generate", "--out"])
        .arg(&out)
        .arg(&previous)
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading previous schedule"));
    assert!(!out.exists());
}

#[test]
fn oversized_weeks_are_rejected() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("schedule.json");

    roster()
        .args(["generate", "--weeks", "53", "--out"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("weeks must be within 1..=52"));
    assert!(!out.exists());
}
