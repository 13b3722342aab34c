// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rp_core::{EntryId, EntryKind, Outbox, QuarantinedEntry};
use serde::Serialize;
use tracing::info;

use crate::cli::OutputFormat;
use crate::colors;
use crate::error::Result;

use super::{format_timestamp, open_outbox};

#[derive(Debug, Serialize)]
pub(crate) struct QuarantinedJson {
    pub id: EntryId,
    pub kind: EntryKind,
    pub summary: String,
    pub reason: String,
    pub failures: u32,
    pub quarantined_at: u64,
}

impl From<&QuarantinedEntry> for QuarantinedJson {
    fn from(held: &QuarantinedEntry) -> Self {
        QuarantinedJson {
            id: held.entry.id,
            kind: held.entry.kind(),
            summary: held.entry.payload.summary(),
            reason: held.reason.clone(),
            failures: held.failures,
            quarantined_at: held.quarantined_at,
        }
    }
}

pub fn list(output: OutputFormat) -> Result<()> {
    let (outbox, _, _) = open_outbox()?;
    let held = outbox.list_quarantined()?;
    match output {
        OutputFormat::Text => print!("{}", render_text(&held)),
        OutputFormat::Json => {
            let items: Vec<QuarantinedJson> = held.iter().map(QuarantinedJson::from).collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }
    Ok(())
}

pub fn restore(ids: Vec<EntryId>) -> Result<()> {
    let (mut outbox, _, _) = open_outbox()?;
    for id in restore_impl(&mut outbox, &ids)? {
        println!("Restored entry {}", id);
    }
    Ok(())
}

/// Restore each id in turn, stopping at the first unknown one.
pub(crate) fn restore_impl(outbox: &mut Outbox, ids: &[EntryId]) -> Result<Vec<EntryId>> {
    let mut restored = Vec::with_capacity(ids.len());
    for &id in ids {
        outbox.restore(id)?;
        info!(entry_id = id, "restored quarantined entry");
        restored.push(id);
    }
    Ok(restored)
}

pub(crate) fn render_text(held: &[QuarantinedEntry]) -> String {
    if held.is_empty() {
        return "No quarantined entries\n".to_string();
    }
    let mut out = String::new();
    for entry in held {
        out.push_str(&format!(
            "{} {}  {}\n",
            colors::held(&format!("#{}", entry.entry.id)),
            entry.entry.payload.summary(),
            colors::context(&format_timestamp(entry.quarantined_at))
        ));
        out.push_str(&format!(
            "  {} after {} failure(s)\n",
            entry.reason, entry.failures
        ));
    }
    out
}

#[cfg(test)]
#[path = "quarantine_tests.rs"]
mod tests;
