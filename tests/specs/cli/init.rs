// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::common::*;

#[test]
fn init_creates_work_dir() {
    let temp = TempDir::new().unwrap();
    reporta()
        .args(["init", "--api-url", "https://api.example.com/"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized reporta"));

    let work_dir = temp.path().join(".reporta");
    assert!(work_dir.join("config.toml").is_file());
    assert!(work_dir.join("outbox.db").is_file());
    let config = std::fs::read_to_string(work_dir.join("config.toml")).unwrap();
    assert!(config.contains("api_url = \"https://api.example.com\""));
    let gitignore = std::fs::read_to_string(work_dir.join(".gitignore")).unwrap();
    assert!(gitignore.contains("credentials.json"));
}

#[test]
fn init_twice_fails() {
    let temp = init_temp();
    reporta()
        .args(["init", "--api-url", UNREACHABLE_API])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_with_path() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("truck-4");
    reporta()
        .args(["init", "--api-url", UNREACHABLE_API, "--path"])
        .arg(&target)
        .assert()
        .success();
    assert!(target.join(".reporta/config.toml").is_file());
}

#[test]
fn init_rejects_bad_url() {
    let temp = TempDir::new().unwrap();
    reporta()
        .args(["init", "--api-url", "api.example.com"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid API url"));
    assert!(!temp.path().join(".reporta/config.toml").exists());
}

#[test]
fn commands_outside_work_dir_fail() {
    let temp = TempDir::new().unwrap();
    reporta()
        .arg("pending")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("reporta init"));
}

#[test]
fn directory_flag_changes_working_dir() {
    let temp = init_temp();
    let elsewhere = TempDir::new().unwrap();
    reporta()
        .arg("-C")
        .arg(temp.path())
        .arg("pending")
        .current_dir(elsewhere.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing pending"));
}

#[test]
fn work_dir_is_found_from_subdirectory() {
    let temp = init_temp();
    let nested = temp.path().join("jobs/2026");
    std::fs::create_dir_all(&nested).unwrap();
    reporta()
        .arg("pending")
        .current_dir(&nested)
        .assert()
        .success();
}
