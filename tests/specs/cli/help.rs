// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::common::*;

#[test]
fn help_lists_command_sections() {
    reporta()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Service Visits:"))
        .stdout(predicate::str::contains("Outbox:"))
        .stdout(predicate::str::contains("Setup:"));
}

#[test]
fn version_matches_package() {
    reporta()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completion_generates_script() {
    reporta()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reporta"));
}

#[test]
fn send_without_recipient_is_usage_error() {
    reporta()
        .args(["send", "svc_1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}
