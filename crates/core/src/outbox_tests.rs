// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::clock::ManualClock;
use crate::entry::EntryKind;
use crate::service::{
    Attachment, FileCategory, PendingAttachments, ReportDispatch, ServiceCreateRequest,
};
use std::sync::Arc;

fn manual_outbox(start_ms: u64) -> (Outbox, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_ms));
    let outbox = Outbox::open_in_memory_with_clock(Box::new(Arc::clone(&clock))).unwrap();
    (outbox, clock)
}

fn report(record_id: &str) -> EntryPayload {
    EntryPayload::send_report(
        record_id,
        ReportDispatch { client_emails: vec!["ops@acme.test".into()], notes: None },
    )
}

fn service_with_files() -> EntryPayload {
    let mut request = ServiceCreateRequest::new("svc-uid-1");
    request.client_name = Some("Acme".into());
    EntryPayload::create_service(
        request,
        PendingAttachments {
            photos: vec![
                Attachment::new("p1.jpg", FileCategory::Photo, vec![0xff, 0xd8, 0x01]),
                Attachment::new("p2.jpg", FileCategory::Photo, vec![0xff, 0xd8, 0x02]),
            ],
            attachments: vec![Attachment::new("r.pdf", FileCategory::Pdf, b"%PDF".to_vec())],
            signature: Some(Attachment::new("firma.png", FileCategory::Signature, vec![0x89])),
        },
    )
}

fn pending_ids(outbox: &Outbox) -> Vec<EntryId> {
    outbox.list_pending().unwrap().iter().map(|e| e.id).collect()
}

#[test]
fn new_outbox_is_empty() {
    let outbox = Outbox::open_in_memory().unwrap();
    assert!(outbox.is_empty().unwrap());
    assert_eq!(outbox.len().unwrap(), 0);
    assert!(outbox.list_pending().unwrap().is_empty());
}

#[test]
fn enqueue_stamps_clock_and_returns_increasing_ids() {
    let (mut outbox, clock) = manual_outbox(1_000);
    let first = outbox.enqueue(&report("svc_1")).unwrap();
    clock.advance(500);
    let second = outbox.enqueue(&report("svc_2")).unwrap();

    assert!(second > first);
    let pending = outbox.list_pending().unwrap();
    assert_eq!(pending[0].created_at, 1_000);
    assert_eq!(pending[1].created_at, 1_500);
    assert_eq!(pending[0].kind(), EntryKind::SendReport);
}

#[test]
fn list_pending_orders_by_created_at() {
    let (mut outbox, clock) = manual_outbox(5_000);
    let late = outbox.enqueue(&report("late")).unwrap();
    clock.set(1_000);
    let early = outbox.enqueue(&report("early")).unwrap();

    assert_eq!(pending_ids(&outbox), [early, late]);
}

#[test]
fn equal_timestamps_break_ties_by_id() {
    let (mut outbox, _clock) = manual_outbox(42);
    let a = outbox.enqueue(&report("a")).unwrap();
    let b = outbox.enqueue(&report("b")).unwrap();
    let c = outbox.enqueue(&report("c")).unwrap();

    assert_eq!(pending_ids(&outbox), [a, b, c]);
}

#[test]
fn remove_is_idempotent() {
    let mut outbox = Outbox::open_in_memory().unwrap();
    let id = outbox.enqueue(&report("svc_1")).unwrap();

    outbox.remove(id).unwrap();
    outbox.remove(id).unwrap();
    outbox.remove(9_999).unwrap();

    assert!(outbox.is_empty().unwrap());
    assert!(outbox.get(id).unwrap().is_none());
}

#[test]
fn attachment_bytes_round_trip_through_blob_table() {
    let mut outbox = Outbox::open_in_memory().unwrap();
    let payload = service_with_files();
    let id = outbox.enqueue(&payload).unwrap();

    let entry = outbox.get(id).unwrap().unwrap();
    assert_eq!(entry.payload, payload);
    let sizes: Vec<usize> = entry.payload.attachments().iter().map(|a| a.content.len()).collect();
    assert_eq!(sizes, [3, 3, 4, 1]);
}

#[test]
fn entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("outbox.db");

    let payload = service_with_files();
    let id = {
        let mut outbox = Outbox::open(&path).unwrap();
        let id = outbox.enqueue(&payload).unwrap();
        outbox.enqueue(&report("svc_9")).unwrap();
        id
    };

    let outbox = Outbox::open(&path).unwrap();
    let pending = outbox.list_pending().unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, id);
    assert_eq!(pending[0].payload, payload);
}

#[test]
fn ids_are_not_reused_after_remove() {
    let mut outbox = Outbox::open_in_memory().unwrap();
    let first = outbox.enqueue(&report("a")).unwrap();
    outbox.remove(first).unwrap();
    let second = outbox.enqueue(&report("b")).unwrap();
    assert!(second > first);
}

#[test]
fn progress_is_recorded_and_cleared_with_entry() {
    let mut outbox = Outbox::open_in_memory().unwrap();
    let id = outbox.enqueue(&service_with_files()).unwrap();

    assert_eq!(outbox.progress(id).unwrap(), EntryProgress::default());

    outbox.record_created(id, "svc_77").unwrap();
    outbox.record_uploaded(id, 1).unwrap();
    outbox.record_uploaded(id, 0).unwrap();
    outbox.record_uploaded(id, 1).unwrap();

    let progress = outbox.progress(id).unwrap();
    assert_eq!(progress.record_id.as_deref(), Some("svc_77"));
    assert_eq!(progress.uploaded_slots, [0, 1]);

    outbox.remove(id).unwrap();
    assert_eq!(outbox.progress(id).unwrap(), EntryProgress::default());
}

#[test]
fn permanent_failures_accumulate() {
    let mut outbox = Outbox::open_in_memory().unwrap();
    let id = outbox.enqueue(&report("svc_1")).unwrap();

    assert_eq!(outbox.record_permanent_failure(id, "422 bad email").unwrap(), 1);
    assert_eq!(outbox.record_permanent_failure(id, "422 bad email").unwrap(), 2);
}

#[test]
fn quarantine_hides_entry_until_restored() {
    let (mut outbox, clock) = manual_outbox(1_000);
    let a = outbox.enqueue(&report("a")).unwrap();
    let b = outbox.enqueue(&report("b")).unwrap();

    outbox.record_permanent_failure(a, "400 missing client").unwrap();
    clock.set(9_000);
    outbox.quarantine(a, "400 missing client").unwrap();

    assert_eq!(pending_ids(&outbox), [b]);
    assert_eq!(outbox.len().unwrap(), 1);

    let quarantined = outbox.list_quarantined().unwrap();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(quarantined[0].entry.id, a);
    assert_eq!(quarantined[0].reason, "400 missing client");
    assert_eq!(quarantined[0].failures, 1);
    assert_eq!(quarantined[0].quarantined_at, 9_000);

    outbox.restore(a).unwrap();
    assert_eq!(pending_ids(&outbox), [a, b]);
    assert!(outbox.list_quarantined().unwrap().is_empty());
    assert_eq!(outbox.record_permanent_failure(a, "again").unwrap(), 1);
}

#[test]
fn quarantine_unknown_entry_fails() {
    let outbox = Outbox::open_in_memory().unwrap();
    assert!(matches!(outbox.quarantine(7, "x"), Err(Error::EntryNotFound(7))));
}

#[test]
fn restore_requires_quarantined_entry() {
    let mut outbox = Outbox::open_in_memory().unwrap();
    let id = outbox.enqueue(&report("a")).unwrap();
    assert!(matches!(outbox.restore(id), Err(Error::EntryNotFound(_))));
}

#[test]
fn missing_blob_is_reported_as_corruption() {
    let mut outbox = Outbox::open_in_memory().unwrap();
    let id = outbox.enqueue(&service_with_files()).unwrap();
    outbox.conn.execute("DELETE FROM outbox_files WHERE slot = 2", []).unwrap();

    assert!(matches!(outbox.get(id), Err(Error::CorruptedData(_))));
}
