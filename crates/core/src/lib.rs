// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rp-core: Shared library for the reporta field-service client
//!
//! This crate provides the service visit types and the durable outbox that
//! holds deferred writes until they can be delivered.

pub mod clock;
pub mod entry;
pub mod error;
pub mod outbox;
pub mod service;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use entry::{EntryId, EntryKind, EntryPayload, EntryProgress, OutboxEntry, QuarantinedEntry};
pub use error::{Error, Result};
pub use outbox::Outbox;
pub use service::{
    Attachment, FileCategory, PendingAttachments, ReportDispatch, ServiceCreateRequest,
    DEFAULT_SERVICE_TYPE,
};
