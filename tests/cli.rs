use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

fn class_day_csv() -> &'static str {
    "category,start,end\r\nBreak,9:45,10:00\r\nMath,9:00,9:45\r\nX,10:00,9:00\r\n"
}

#[test]
fn import_then_once_shows_active_and_next() {
    let dir = tempdir().expect("tempdir");
    let csv = dir.path().join("day.csv");
    fs::write(&csv, class_day_csv()).expect("write csv");

    let mut cmd = cargo_bin_cmd!("schedule-countdown");
    cmd.arg("--store")
        .arg(dir.path().join("store.json"))
        .arg("--import")
        .arg(&csv)
        .arg("--at")
        .arg("9:30")
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 item(s), dropped 1 row(s)"))
        .stdout(predicate::str::contains("Clock      ANCHORED"))
        .stdout(predicate::str::contains("Current    Math  until 9:45"))
        .stdout(predicate::str::contains("Remaining  00:15:00"))
        .stdout(predicate::str::contains("Up next    Break  9:45 - 10:00"));
}

#[test]
fn imported_schedule_is_restored_from_store() {
    let dir = tempdir().expect("tempdir");
    let csv = dir.path().join("day.csv");
    let store = dir.path().join("store.json");
    fs::write(&csv, class_day_csv()).expect("write csv");

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(&store)
        .arg("--import")
        .arg(&csv)
        .arg("--list")
        .assert()
        .success();

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(&store)
        .arg("--at")
        .arg("09:45:00")
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current    Break  until 10:00"))
        .stdout(predicate::str::contains("No more tasks"));
}

#[test]
fn missing_import_file_keeps_previous_schedule() {
    let dir = tempdir().expect("tempdir");
    let csv = dir.path().join("day.csv");
    let store = dir.path().join("store.json");
    fs::write(&csv, class_day_csv()).expect("write csv");

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(&store)
        .arg("--import")
        .arg(&csv)
        .arg("--list")
        .assert()
        .success();

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(&store)
        .arg("--import")
        .arg(dir.path().join("missing.csv"))
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Math"))
        .stderr(predicate::str::contains("import failed"));
}

#[test]
fn clear_empties_the_store() {
    let dir = tempdir().expect("tempdir");
    let csv = dir.path().join("day.csv");
    let store = dir.path().join("store.json");
    fs::write(&csv, class_day_csv()).expect("write csv");

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(&store)
        .arg("--import")
        .arg(&csv)
        .arg("--list")
        .assert()
        .success();

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(&store)
        .arg("--clear")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("(schedule is empty)"));
}

#[test]
fn corrupt_store_starts_empty() {
    let dir = tempdir().expect("tempdir");
    let store = dir.path().join("store.json");
    fs::write(&store, "{ not-valid-json ").expect("write store");

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(&store)
        .arg("--at")
        .arg("12:00")
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains("no schedule loaded"));
}

#[test]
fn custom_layout_from_settings_file() {
    let dir = tempdir().expect("tempdir");
    let csv = dir.path().join("race.csv");
    let settings = dir.path().join("settings.json");
    fs::write(
        &csv,
        "series;session;start;end\nF1;Qualifying;14:00;15:00\nF2;Sprint;10:05;10:50\n",
    )
    .expect("write csv");
    fs::write(
        &settings,
        r#"{ "version": 1, "layout": { "delimiter": ";", "label": 1, "start": 2, "end": 3, "details": [ { "name": "series", "column": 0 } ] } }"#,
    )
    .expect("write settings");

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(dir.path().join("store.json"))
        .arg("--config")
        .arg(&settings)
        .arg("--import")
        .arg(&csv)
        .arg("--at")
        .arg("10:30")
        .arg("--once")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current    Sprint [F2]  until 10:50"))
        .stdout(predicate::str::contains("Up next    Qualifying [F1]  14:00 - 15:00"));
}

#[test]
fn malformed_settings_fail_with_clear_error() {
    let dir = tempdir().expect("tempdir");
    let settings = dir.path().join("settings.json");
    fs::write(&settings, "{ not-valid-json ").expect("write settings");

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(dir.path().join("store.json"))
        .arg("--config")
        .arg(&settings)
        .arg("--list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn invalid_start_time_is_rejected() {
    let dir = tempdir().expect("tempdir");

    cargo_bin_cmd!("schedule-countdown")
        .arg("--store")
        .arg(dir.path().join("store.json"))
        .arg("--at")
        .arg("25:00")
        .arg("--once")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --at time"));
}
