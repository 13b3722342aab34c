// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::common::*;

#[test]
fn list_empty() {
    let temp = init_temp();
    reporta()
        .args(["quarantine", "list"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No quarantined entries"));

    let output = reporta()
        .args(["quarantine", "list", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value, serde_json::json!([]));
}

#[test]
fn restore_of_entry_not_held_fails() {
    let temp = init_temp();
    reporta()
        .args(["new", "--client", "Acme", "--offline"])
        .current_dir(temp.path())
        .assert()
        .success();

    reporta()
        .args(["quarantine", "restore", "1"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("outbox entry not found: 1"));
    assert_eq!(pending_count(&temp), 1);
}
