// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One ordered pass over the outbox.
//!
//! A pass snapshots the pending entries once and replays them in
//! `(created_at, id)` order. An entry is removed only after its remote
//! operation and every operation it implies have succeeded. The first
//! failure ends the pass so nothing overtakes a blocked entry.

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use rp_core::{Attachment, EntryId, EntryPayload, OutboxEntry};

use super::{with_outbox, SharedOutbox};
use crate::auth::Session;
use crate::config::SyncSettings;
use crate::remote::{Remote, RemoteError};

/// Tuning for a drain pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainOptions {
    /// Sibling uploads of one composite entry allowed in flight.
    pub upload_concurrency: usize,
    /// Permanent failures before an entry is quarantined (0 = never).
    pub quarantine_after: u32,
}

impl Default for DrainOptions {
    fn default() -> Self {
        DrainOptions { upload_concurrency: 1, quarantine_after: 0 }
    }
}

impl From<&SyncSettings> for DrainOptions {
    fn from(settings: &SyncSettings) -> Self {
        DrainOptions {
            upload_concurrency: settings.upload_concurrency.max(1),
            quarantine_after: settings.quarantine_after,
        }
    }
}

/// Why a pass ended before the queue was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A remote call for this entry failed; the entry stays queued.
    Remote { entry_id: EntryId, error: RemoteError },
    /// The local store failed.
    Storage(String),
}

/// Outcome of a drain pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Entries delivered and removed.
    pub delivered: usize,
    /// Entries still pending when the pass ended.
    pub remaining: usize,
    pub stopped: Option<StopReason>,
    /// Entries moved to quarantine during the pass.
    pub quarantined: Vec<EntryId>,
}

impl PassReport {
    /// True if the pass ran through its whole snapshot.
    pub fn is_complete(&self) -> bool {
        self.stopped.is_none()
    }

    fn stop_on_storage(&mut self, err: rp_core::Error) {
        warn!(error = %err, "drain pass stopped on local storage error");
        self.stopped = Some(StopReason::Storage(err.to_string()));
    }
}

enum DeliveryError {
    Remote(RemoteError),
    Storage(rp_core::Error),
}

impl From<RemoteError> for DeliveryError {
    fn from(e: RemoteError) -> Self {
        DeliveryError::Remote(e)
    }
}

impl From<rp_core::Error> for DeliveryError {
    fn from(e: rp_core::Error) -> Self {
        DeliveryError::Storage(e)
    }
}

/// Replay pending entries in order until the snapshot is exhausted or an
/// entry fails.
///
/// Never returns an error: failures are logged and reported in
/// [`PassReport::stopped`].
pub async fn drain_pass<R: Remote>(
    outbox: &SharedOutbox,
    session: &Session<R>,
    options: &DrainOptions,
) -> PassReport {
    let mut report = PassReport::default();

    let pending = match with_outbox(outbox, |o| o.list_pending()) {
        Ok(pending) => pending,
        Err(e) => {
            report.stop_on_storage(e);
            return report;
        }
    };
    if pending.is_empty() {
        debug!("outbox empty, nothing to drain");
        return report;
    }
    info!(pending = pending.len(), "drain pass started");

    for entry in &pending {
        match deliver(outbox, session, entry, options).await {
            Ok(()) => {
                if let Err(e) = with_outbox(outbox, |o| o.remove(entry.id)) {
                    report.stop_on_storage(e);
                    break;
                }
                report.delivered += 1;
                info!(entry_id = entry.id, kind = %entry.kind(), "entry delivered");
            }
            Err(DeliveryError::Storage(e)) => {
                report.stop_on_storage(e);
                break;
            }
            Err(DeliveryError::Remote(error)) => {
                if error.is_permanent() {
                    match settle_permanent_failure(outbox, entry.id, &error, options) {
                        Ok(true) => {
                            report.quarantined.push(entry.id);
                            continue;
                        }
                        Ok(false) => {}
                        Err(e) => {
                            report.stop_on_storage(e);
                            break;
                        }
                    }
                }
                warn!(entry_id = entry.id, kind = %entry.kind(), error = %error, "drain pass stopped");
                report.stopped = Some(StopReason::Remote { entry_id: entry.id, error });
                break;
            }
        }
    }

    report.remaining = match with_outbox(outbox, |o| o.len()) {
        Ok(n) => n,
        Err(_) => pending.len() - report.delivered - report.quarantined.len(),
    };
    info!(
        delivered = report.delivered,
        remaining = report.remaining,
        quarantined = report.quarantined.len(),
        "drain pass finished"
    );
    report
}

/// Count a permanent failure; returns true if the entry was quarantined.
fn settle_permanent_failure(
    outbox: &SharedOutbox,
    entry_id: EntryId,
    error: &RemoteError,
    options: &DrainOptions,
) -> rp_core::Result<bool> {
    let message = error.to_string();
    with_outbox(outbox, |o| {
        let failures = o.record_permanent_failure(entry_id, &message)?;
        if options.quarantine_after == 0 || failures < options.quarantine_after {
            return Ok(false);
        }
        o.quarantine(entry_id, &message)?;
        warn!(entry_id, failures, error = %message, "entry quarantined");
        Ok(true)
    })
}

async fn deliver<R: Remote>(
    outbox: &SharedOutbox,
    session: &Session<R>,
    entry: &OutboxEntry,
    options: &DrainOptions,
) -> Result<(), DeliveryError> {
    debug!(entry_id = entry.id, kind = %entry.kind(), "delivering entry");
    match &entry.payload {
        EntryPayload::CreateServiceRecord { request, attachments } => {
            let progress = with_outbox(outbox, |o| o.progress(entry.id))?;
            let record_id = match progress.record_id.clone() {
                Some(record_id) => {
                    debug!(entry_id = entry.id, record_id = %record_id, "record already created, resuming uploads");
                    record_id
                }
                None => {
                    let record = session.create_record(request).await?;
                    with_outbox(outbox, |o| o.record_created(entry.id, &record.id))?;
                    record.id
                }
            };
            let remaining: Vec<(usize, &Attachment)> = attachments
                .iter()
                .enumerate()
                .filter(|(slot, _)| !progress.is_uploaded(*slot))
                .collect();
            upload_slots(outbox, session, entry.id, &record_id, remaining, options.upload_concurrency)
                .await
        }
        EntryPayload::UploadFile { record_id, attachment } => {
            session.upload_file(record_id, attachment).await?;
            Ok(())
        }
        EntryPayload::SendReport { record_id, dispatch } => {
            session.send_report(record_id, dispatch).await?;
            Ok(())
        }
    }
}

/// Upload the given slots of a composite entry, recording each success.
///
/// With `concurrency > 1` siblings run concurrently; every upload already in
/// flight is allowed to finish and the first failure is reported.
async fn upload_slots<R: Remote>(
    outbox: &SharedOutbox,
    session: &Session<R>,
    entry_id: EntryId,
    record_id: &str,
    slots: Vec<(usize, &Attachment)>,
    concurrency: usize,
) -> Result<(), DeliveryError> {
    if concurrency <= 1 {
        for (slot, attachment) in slots {
            session.upload_file(record_id, attachment).await?;
            with_outbox(outbox, |o| o.record_uploaded(entry_id, slot))?;
        }
        return Ok(());
    }

    let mut pending = Vec::with_capacity(slots.len());
    for (slot, attachment) in slots {
        pending.push(upload_slot(session, record_id, slot, attachment));
    }
    let mut uploads = stream::iter(pending).buffer_unordered(concurrency);

    let mut first_error = None;
    while let Some(result) = uploads.next().await {
        match result {
            Ok(slot) => with_outbox(outbox, |o| o.record_uploaded(entry_id, slot))?,
            Err(e) => {
                debug!(entry_id, error = %e, "sibling upload failed");
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

async fn upload_slot<R: Remote>(
    session: &Session<R>,
    record_id: &str,
    slot: usize,
    attachment: &Attachment,
) -> Result<usize, RemoteError> {
    session.upload_file(record_id, attachment).await.map(|_| slot)
}
