// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outbox entries: deferred writes waiting for connectivity.
//!
//! Every write that cannot be delivered immediately becomes an entry. Entries
//! are:
//!
//! - Durable: persisted before the caller is acknowledged
//! - Immutable: retries re-read the same entry; only deletion changes it
//! - Totally ordered: by enqueue time, ties broken by id

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::service::{Attachment, PendingAttachments, ReportDispatch, ServiceCreateRequest};

/// Locally-assigned entry identifier (SQLite rowid, monotonically increasing).
pub type EntryId = i64;

/// Discriminant of an entry, stored in its own indexed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Create a service record, then upload its pending attachments.
    CreateServiceRecord,
    /// Upload one file to an existing record.
    UploadFile,
    /// Sign the record and email the report to the client.
    SendReport,
}

impl EntryKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::CreateServiceRecord => "create_service_record",
            EntryKind::UploadFile => "upload_file",
            EntryKind::SendReport => "send_report",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create_service_record" => Ok(EntryKind::CreateServiceRecord),
            "upload_file" => Ok(EntryKind::UploadFile),
            "send_report" => Ok(EntryKind::SendReport),
            _ => Err(Error::UnknownKind(s.to_string())),
        }
    }
}

/// Variant-specific data of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryPayload {
    /// Create a service record. Attachments are uploaded once the server
    /// has assigned the record id.
    CreateServiceRecord {
        request: ServiceCreateRequest,
        #[serde(default)]
        attachments: PendingAttachments,
    },

    /// Upload a file to an already-known record.
    UploadFile { record_id: String, attachment: Attachment },

    /// Sign and send the service report.
    SendReport { record_id: String, dispatch: ReportDispatch },
}

impl EntryPayload {
    /// Creates a CreateServiceRecord payload.
    pub fn create_service(request: ServiceCreateRequest, attachments: PendingAttachments) -> Self {
        EntryPayload::CreateServiceRecord { request, attachments }
    }

    /// Creates an UploadFile payload.
    pub fn upload_file(record_id: impl Into<String>, attachment: Attachment) -> Self {
        EntryPayload::UploadFile { record_id: record_id.into(), attachment }
    }

    /// Creates a SendReport payload.
    pub fn send_report(record_id: impl Into<String>, dispatch: ReportDispatch) -> Self {
        EntryPayload::SendReport { record_id: record_id.into(), dispatch }
    }

    /// Returns the kind of this payload.
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryPayload::CreateServiceRecord { .. } => EntryKind::CreateServiceRecord,
            EntryPayload::UploadFile { .. } => EntryKind::UploadFile,
            EntryPayload::SendReport { .. } => EntryKind::SendReport,
        }
    }

    /// Files carried by this payload, in slot order.
    pub fn attachments(&self) -> Vec<&Attachment> {
        match self {
            EntryPayload::CreateServiceRecord { attachments, .. } => attachments.iter().collect(),
            EntryPayload::UploadFile { attachment, .. } => vec![attachment],
            EntryPayload::SendReport { .. } => Vec::new(),
        }
    }

    /// Mutable access to the files carried by this payload, in slot order.
    pub fn attachments_mut(&mut self) -> Vec<&mut Attachment> {
        match self {
            EntryPayload::CreateServiceRecord { attachments, .. } => {
                attachments.iter_mut().collect()
            }
            EntryPayload::UploadFile { attachment, .. } => vec![attachment],
            EntryPayload::SendReport { .. } => Vec::new(),
        }
    }

    /// Short human-readable description for listings.
    pub fn summary(&self) -> String {
        match self {
            EntryPayload::CreateServiceRecord { request, attachments } => {
                let who = request
                    .client_name
                    .as_deref()
                    .or(request.site_name.as_deref())
                    .unwrap_or("unnamed");
                format!(
                    "create service {} ({}, {} file(s))",
                    request.service_uid,
                    who,
                    attachments.len()
                )
            }
            EntryPayload::UploadFile { record_id, attachment } => format!(
                "upload {} {} to {}",
                attachment.category, attachment.file_name, record_id
            ),
            EntryPayload::SendReport { record_id, dispatch } => format!(
                "send report {} to {}",
                record_id,
                dispatch.client_emails.join(", ")
            ),
        }
    }
}

/// A queued deferred write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    pub id: EntryId,
    pub payload: EntryPayload,
    /// Enqueue time in milliseconds since Unix epoch.
    pub created_at: u64,
}

impl OutboxEntry {
    /// Returns the kind of this entry.
    pub fn kind(&self) -> EntryKind {
        self.payload.kind()
    }
}

impl PartialOrd for OutboxEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Replay order: enqueue time, then id.
impl Ord for OutboxEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.created_at.cmp(&other.created_at).then_with(|| self.id.cmp(&other.id))
    }
}

/// Partial completion of a composite entry, persisted between passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryProgress {
    /// Server-assigned record id, once creation succeeded.
    pub record_id: Option<String>,
    /// Attachment slots already uploaded.
    pub uploaded_slots: Vec<usize>,
}

impl EntryProgress {
    /// Returns true if the given slot was already uploaded.
    pub fn is_uploaded(&self, slot: usize) -> bool {
        self.uploaded_slots.contains(&slot)
    }
}

/// An entry moved out of the replay queue after repeated permanent failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantinedEntry {
    pub entry: OutboxEntry,
    /// Last error reported by the server.
    pub reason: String,
    /// Number of permanent failures recorded.
    pub failures: u32,
    /// When the entry was quarantined (milliseconds since Unix epoch).
    pub quarantined_at: u64,
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
