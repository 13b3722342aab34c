// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::common::*;

#[test]
fn status_without_credentials_fails() {
    let temp = init_temp();
    reporta()
        .args(["auth", "status"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not authenticated"));
}

#[test]
fn set_status_clear() {
    let temp = init_authenticated();
    assert!(temp.path().join(".reporta/credentials.json").is_file());

    reporta()
        .args(["auth", "status"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("authenticated"))
        .stdout(predicate::str::contains("acc-1").not());

    reporta()
        .args(["auth", "clear"])
        .current_dir(temp.path())
        .assert()
        .success();
    assert!(!temp.path().join(".reporta/credentials.json").exists());
}
