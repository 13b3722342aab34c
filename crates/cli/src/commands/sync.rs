// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use crate::colors;
use crate::env;
use crate::error::{Error, Result};
use crate::sync::{
    with_outbox, DrainOptions, PassReport, StopReason, SyncRunner, Trigger, TriggerOutcome,
};

use super::{acquire_lock, entry_suffix, open_context};

pub async fn run(quiet: bool) -> Result<()> {
    let ctx = open_context()?;
    let _lock = acquire_lock(&ctx.work_dir)?;

    if env::force_offline() {
        let waiting = with_outbox(&ctx.outbox, |o| o.len())?;
        if !quiet {
            println!(
                "{} {} entr{} waiting",
                colors::queued("offline:"),
                waiting,
                entry_suffix(waiting)
            );
        }
        return Ok(());
    }

    let runner = SyncRunner::new(
        ctx.outbox.clone(),
        Arc::clone(&ctx.session),
        DrainOptions::from(&ctx.config.sync),
    );
    let report = match runner.try_drain(Trigger::Manual).await {
        TriggerOutcome::Completed(report) => report,
        TriggerOutcome::Skipped => return Err(Error::SyncInProgress),
    };

    if !quiet || !report.is_complete() {
        print!("{}", render_report(&report));
    }
    check_report(report)
}

/// Transient stops leave work queued for later and are not failures.
pub(crate) fn check_report(report: PassReport) -> Result<()> {
    match report.stopped {
        Some(StopReason::Remote { error, .. }) if !error.is_transient() => Err(error.into()),
        Some(StopReason::Storage(message)) => Err(Error::Storage(message)),
        _ => Ok(()),
    }
}

pub(crate) fn render_report(report: &PassReport) -> String {
    let mut out = format!(
        "{} {}, {} remaining\n",
        colors::delivered("delivered"),
        report.delivered,
        report.remaining
    );
    if !report.quarantined.is_empty() {
        let ids: Vec<String> = report.quarantined.iter().map(|id| format!("#{id}")).collect();
        out.push_str(&format!(
            "{} {}\n",
            colors::held("quarantined"),
            ids.join(", ")
        ));
    }
    match &report.stopped {
        Some(StopReason::Remote { entry_id, error }) if error.is_transient() => {
            out.push_str(&format!(
                "{} at #{}: {} (will retry)\n",
                colors::queued("paused"),
                entry_id,
                error
            ));
        }
        Some(StopReason::Remote { entry_id, error }) => {
            out.push_str(&format!(
                "{} at #{}: {}\n",
                colors::held("blocked"),
                entry_id,
                error
            ));
        }
        Some(StopReason::Storage(message)) => {
            out.push_str(&format!("{} {}\n", colors::held("storage error:"), message));
        }
        None => {}
    }
    out
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
