// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::common::*;

#[test]
fn offline_visit_is_queued_with_its_files() {
    let temp = init_temp();
    write_file(&temp, "p1.jpg", b"photo-one");
    write_file(&temp, "sig.png", b"ink");

    reporta()
        .args([
            "new", "--client", "Acme", "--site", "Plant 3", "--photo", "p1.jpg", "--signature",
            "sig.png", "--offline",
        ])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("queued as entry 1"));

    let pending = pending_json(&temp);
    let entry = &pending["entries"][0];
    assert_eq!(entry["kind"], "create_service_record");
    assert_eq!(entry["files"], 2);
    assert!(entry["summary"].as_str().unwrap().contains("Acme"));
}

#[test]
fn unreachable_api_queues_instead_of_failing() {
    let temp = init_authenticated();
    reporta()
        .args(["new", "--client", "Acme", "-o", "json"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"queued\""));
    assert_eq!(pending_count(&temp), 1);
}

#[test]
fn offline_env_queues_every_write_kind() {
    let temp = init_temp();
    write_file(&temp, "report.pdf", b"%PDF-1.4");

    for args in [
        vec!["new", "--client", "Acme"],
        vec!["upload", "svc_7", "report.pdf"],
        vec!["send", "svc_7", "-e", "ops@acme.com"],
    ] {
        reporta()
            .args(&args)
            .env("REPORTA_OFFLINE", "1")
            .current_dir(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("queued"));
    }

    let pending = pending_json(&temp);
    let kinds: Vec<_> = pending["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, ["create_service_record", "upload_file", "send_report"]);
}

#[test]
fn pending_text_lists_entries_in_order() {
    let temp = init_temp();
    for client in ["First", "Second"] {
        reporta()
            .args(["new", "--client", client, "--offline"])
            .current_dir(temp.path())
            .assert()
            .success();
    }
    let output = reporta()
        .arg("pending")
        .current_dir(temp.path())
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.find("First").unwrap();
    let second = stdout.find("Second").unwrap();
    assert!(first < second);
}

#[test]
fn upload_with_unknown_extension_needs_a_kind() {
    let temp = init_temp();
    write_file(&temp, "notes.txt", b"hello");

    reporta()
        .args(["upload", "svc_1", "notes.txt", "--offline"])
        .current_dir(temp.path())
        .assert()
        .failure();
    assert_eq!(pending_count(&temp), 0);

    reporta()
        .args(["upload", "svc_1", "notes.txt", "--kind", "pdf", "--offline"])
        .current_dir(temp.path())
        .assert()
        .success();
    assert_eq!(pending_count(&temp), 1);
}

#[test]
fn missing_photo_fails_without_queueing() {
    let temp = init_temp();
    reporta()
        .args(["new", "--client", "Acme", "--photo", "missing.jpg", "--offline"])
        .current_dir(temp.path())
        .assert()
        .failure();
    assert_eq!(pending_count(&temp), 0);
}

#[test]
fn sync_while_forced_offline_keeps_queue() {
    let temp = init_temp();
    reporta()
        .args(["new", "--client", "Acme", "--offline"])
        .current_dir(temp.path())
        .assert()
        .success();

    reporta()
        .arg("sync")
        .env("REPORTA_OFFLINE", "1")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("offline: 1 entry waiting"));
    assert_eq!(pending_count(&temp), 1);
}

#[test]
fn sync_against_unreachable_api_pauses() {
    let temp = init_authenticated();
    reporta()
        .args(["new", "--client", "Acme", "--offline"])
        .current_dir(temp.path())
        .assert()
        .success();

    reporta()
        .arg("sync")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("delivered 0, 1 remaining"))
        .stdout(predicate::str::contains("will retry"));
    assert_eq!(pending_count(&temp), 1);
}

#[test]
fn sync_of_empty_outbox_is_quiet_with_flag() {
    let temp = init_authenticated();
    reporta()
        .args(["sync", "--quiet"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
