// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rp_core::{EntryId, EntryKind, Outbox, OutboxEntry};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::colors;
use crate::error::Result;

use super::{entry_suffix, format_timestamp, open_outbox};

/// JSON representation of a queued entry.
#[derive(Debug, Serialize)]
pub(crate) struct PendingEntryJson {
    pub id: EntryId,
    pub kind: EntryKind,
    pub summary: String,
    pub created_at: u64,
    pub files: usize,
    /// Files already delivered for a partially replayed visit.
    pub uploaded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PendingOutputJson {
    pub entries: Vec<PendingEntryJson>,
    pub quarantined: usize,
}

pub fn run(output: OutputFormat) -> Result<()> {
    let (outbox, _, _) = open_outbox()?;
    let report = collect(&outbox)?;
    match output {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

pub(crate) fn collect(outbox: &Outbox) -> Result<PendingOutputJson> {
    let entries = outbox
        .list_pending()?
        .into_iter()
        .map(|entry| describe(outbox, entry))
        .collect::<Result<Vec<_>>>()?;
    let quarantined = outbox.list_quarantined()?.len();
    Ok(PendingOutputJson {
        entries,
        quarantined,
    })
}

fn describe(outbox: &Outbox, entry: OutboxEntry) -> Result<PendingEntryJson> {
    let progress = outbox.progress(entry.id)?;
    Ok(PendingEntryJson {
        id: entry.id,
        kind: entry.kind(),
        summary: entry.payload.summary(),
        created_at: entry.created_at,
        files: entry.payload.attachments().len(),
        uploaded: progress.uploaded_slots.len(),
        record_id: progress.record_id,
    })
}

pub(crate) fn render_text(report: &PendingOutputJson) -> String {
    let mut out = String::new();
    if report.entries.is_empty() {
        out.push_str("Nothing pending\n");
    }
    for entry in &report.entries {
        out.push_str(&format!(
            "{} {}  {}",
            colors::queued(&format!("#{}", entry.id)),
            entry.summary,
            colors::context(&format_timestamp(entry.created_at))
        ));
        if let Some(record_id) = &entry.record_id {
            out.push_str(&format!(
                "  (created as {}, {}/{} file(s) uploaded)",
                record_id, entry.uploaded, entry.files
            ));
        }
        out.push('\n');
    }
    if report.quarantined > 0 {
        out.push_str(&format!(
            "{} {} entr{} held; see 'reporta quarantine list'\n",
            colors::held("quarantine:"),
            report.quarantined,
            entry_suffix(report.quarantined)
        ));
    }
    out
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
