// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The write path: deliver now when possible, queue otherwise.
//!
//! A submission is delivered directly only when the API is reachable and
//! the outbox is empty; a direct call while entries are queued would
//! overtake them. Callers are told which of the two happened.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{info, warn};

use rp_core::{
    Attachment, EntryId, EntryPayload, PendingAttachments, ReportDispatch, ServiceCreateRequest,
};

use crate::auth::Session;
use crate::error::Result;
use crate::remote::{Remote, RemoteError};
use crate::sync::{with_outbox, ReachabilitySignal, SharedOutbox};

/// How a submission may be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Deliver directly if online and nothing is queued.
    #[default]
    Auto,
    /// Always queue.
    Offline,
}

/// Acknowledgement returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The server accepted the write.
    Delivered { record_id: String },
    /// The write is durably queued and will be replayed.
    Queued { entry_id: EntryId },
    /// The record was created but some of its files were queued.
    Partial { record_id: String, queued: Vec<EntryId> },
}

impl Submission {
    pub fn is_queued(&self) -> bool {
        !matches!(self, Submission::Delivered { .. })
    }
}

/// Failures that leave the write retryable later instead of failing it.
fn defers(err: &RemoteError) -> bool {
    err.is_transient() || matches!(err, RemoteError::Unauthorized(_))
}

pub struct Submitter<R> {
    outbox: SharedOutbox,
    session: Arc<Session<R>>,
    signal: ReachabilitySignal,
}

impl<R: Remote> Submitter<R> {
    pub fn new(outbox: SharedOutbox, session: Arc<Session<R>>, signal: ReachabilitySignal) -> Self {
        Submitter { outbox, session, signal }
    }

    fn must_queue(&self, mode: DeliveryMode) -> Result<bool> {
        if mode == DeliveryMode::Offline || !self.signal.is_online() {
            return Ok(true);
        }
        Ok(!with_outbox(&self.outbox, |o| o.is_empty())?)
    }

    fn enqueue(&self, payload: &EntryPayload) -> Result<EntryId> {
        let entry_id = with_outbox(&self.outbox, |o| o.enqueue(payload))?;
        info!(entry_id, kind = %payload.kind(), "queued for later delivery");
        Ok(entry_id)
    }

    fn queue(&self, payload: EntryPayload) -> Result<Submission> {
        Ok(Submission::Queued { entry_id: self.enqueue(&payload)? })
    }

    /// Create a service record with its captured files.
    ///
    /// If creation succeeds but an upload fails, the record id is kept and
    /// the remaining files are queued as individual uploads.
    pub async fn submit_service(
        &self,
        request: ServiceCreateRequest,
        attachments: PendingAttachments,
        mode: DeliveryMode,
    ) -> Result<Submission> {
        if self.must_queue(mode)? {
            return self.queue(EntryPayload::create_service(request, attachments));
        }

        let record = match self.session.create_record(&request).await {
            Ok(record) => record,
            Err(e) if defers(&e) => {
                info!(error = %e, service_uid = %request.service_uid, "direct creation failed");
                return self.queue(EntryPayload::create_service(request, attachments));
            }
            Err(e) => return Err(e.into()),
        };
        info!(record_id = %record.id, "service record created");

        let PendingAttachments { photos, attachments, signature } = attachments;
        let mut files: VecDeque<Attachment> =
            photos.into_iter().chain(attachments).chain(signature).collect();
        while let Some(file) = files.front() {
            let uploaded = self.session.upload_file(&record.id, file).await;
            if let Err(e) = uploaded {
                warn!(record_id = %record.id, file = %file.file_name, error = %e, "upload failed, queueing the rest");
                let mut queued = Vec::new();
                for rest in files {
                    queued.push(self.enqueue(&EntryPayload::upload_file(&record.id, rest))?);
                }
                return Ok(Submission::Partial { record_id: record.id, queued });
            }
            files.pop_front();
        }
        Ok(Submission::Delivered { record_id: record.id })
    }

    /// Upload a file to an existing record.
    pub async fn submit_upload(
        &self,
        record_id: &str,
        attachment: Attachment,
        mode: DeliveryMode,
    ) -> Result<Submission> {
        if self.must_queue(mode)? {
            return self.queue(EntryPayload::upload_file(record_id, attachment));
        }
        match self.session.upload_file(record_id, &attachment).await {
            Ok(_) => Ok(Submission::Delivered { record_id: record_id.to_string() }),
            Err(e) if defers(&e) => {
                info!(error = %e, record_id, "direct upload failed");
                self.queue(EntryPayload::upload_file(record_id, attachment))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sign a record and email its report.
    pub async fn submit_report(
        &self,
        record_id: &str,
        dispatch: ReportDispatch,
        mode: DeliveryMode,
    ) -> Result<Submission> {
        if self.must_queue(mode)? {
            return self.queue(EntryPayload::send_report(record_id, dispatch));
        }
        match self.session.send_report(record_id, &dispatch).await {
            Ok(()) => Ok(Submission::Delivered { record_id: record_id.to_string() }),
            Err(e) if defers(&e) => {
                info!(error = %e, record_id, "direct report failed");
                self.queue(EntryPayload::send_report(record_id, dispatch))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
