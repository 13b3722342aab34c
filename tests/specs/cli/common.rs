// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// An API url nothing listens on; connections are refused right away.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9";

pub fn reporta() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("reporta").unwrap();
    cmd.env_remove("REPORTA_API_URL")
        .env_remove("REPORTA_OFFLINE")
        .env("NO_COLOR", "1");
    cmd
}

/// Initialized temp directory pointing at an unreachable API.
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    reporta()
        .args(["init", "--api-url", UNREACHABLE_API])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Initialized temp directory with stored credentials.
pub fn init_authenticated() -> TempDir {
    let temp = init_temp();
    reporta()
        .args(["auth", "set", "--access", "acc-1", "--refresh", "ref-1"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Write a file into the temp dir.
pub fn write_file(temp: &TempDir, name: &str, content: &[u8]) {
    std::fs::write(temp.path().join(name), content).unwrap();
}

/// Parsed output of `reporta pending -o json`.
pub fn pending_json(temp: &TempDir) -> serde_json::Value {
    let output = reporta()
        .args(["pending", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

pub fn pending_count(temp: &TempDir) -> usize {
    pending_json(temp)["entries"].as_array().unwrap().len()
}
