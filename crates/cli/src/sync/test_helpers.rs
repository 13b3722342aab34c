// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use rp_core::{
    Attachment, EntryId, EntryPayload, FileCategory, ManualClock, Outbox, PendingAttachments,
    ReportDispatch, ServiceCreateRequest,
};

use super::{shared, with_outbox, DrainOptions, SharedOutbox, SyncRunner};
use crate::auth::Session;
use crate::remote::mock::{authed_session, MockRemote};

/// A mock remote, an authenticated session and an in-memory outbox whose
/// clock advances by one millisecond per enqueue.
pub struct Harness {
    _dir: TempDir,
    pub clock: Arc<ManualClock>,
    pub remote: Arc<MockRemote>,
    pub session: Arc<Session<MockRemote>>,
    pub outbox: SharedOutbox,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(1_000));
        let remote = Arc::new(MockRemote::new());
        let session = Arc::new(authed_session(&remote, dir.path()));
        let outbox = shared(Outbox::open_in_memory_with_clock(Box::new(Arc::clone(&clock))).unwrap());
        Harness { _dir: dir, clock, remote, session, outbox }
    }

    pub fn enqueue(&self, payload: EntryPayload) -> EntryId {
        self.clock.advance(1);
        with_outbox(&self.outbox, |o| o.enqueue(&payload)).unwrap()
    }

    pub fn pending_ids(&self) -> Vec<EntryId> {
        with_outbox(&self.outbox, |o| o.list_pending())
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect()
    }

    pub fn runner(&self, options: DrainOptions) -> Arc<SyncRunner<MockRemote>> {
        Arc::new(SyncRunner::new(Arc::clone(&self.outbox), Arc::clone(&self.session), options))
    }
}

pub fn photo(name: &str) -> Attachment {
    Attachment::new(name, FileCategory::Photo, name.as_bytes().to_vec())
}

pub fn service(uid: &str) -> EntryPayload {
    EntryPayload::create_service(ServiceCreateRequest::new(uid), PendingAttachments::default())
}

/// A service with photos `{uid}-0.jpg`, `{uid}-1.jpg`, ... and a signature
/// `{uid}-sig.png`.
pub fn service_with_files(uid: &str, photos: usize) -> EntryPayload {
    let attachments = PendingAttachments {
        photos: (0..photos).map(|i| photo(&format!("{uid}-{i}.jpg"))).collect(),
        attachments: Vec::new(),
        signature: Some(Attachment::new(
            format!("{uid}-sig.png"),
            FileCategory::Signature,
            vec![0x89, 0x50],
        )),
    };
    EntryPayload::create_service(ServiceCreateRequest::new(uid), attachments)
}

pub fn upload(record_id: &str, name: &str) -> EntryPayload {
    EntryPayload::upload_file(record_id, photo(name))
}

pub fn report(record_id: &str) -> EntryPayload {
    EntryPayload::send_report(
        record_id,
        ReportDispatch { client_emails: vec!["client@example.com".into()], notes: None },
    )
}

/// Poll `done` until it holds, sleeping between checks.
pub async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..500 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}
