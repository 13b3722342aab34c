// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rp_core::ReportDispatch;

use crate::cli::DeliveryArgs;
use crate::error::{Error, Result};

use super::upload::require_record_id;
use super::{delivery_mode, describe_submission, open_context, reachability};

pub async fn run(
    service_id: String,
    emails: Vec<String>,
    notes: Option<String>,
    delivery: DeliveryArgs,
) -> Result<()> {
    let record_id = require_record_id(&service_id)?;
    let dispatch = build_dispatch(emails, notes)?;

    let ctx = open_context()?;
    let mode = delivery_mode(delivery.offline);
    let signal = reachability(ctx.remote(), mode, &ctx.config).await;
    let submission = ctx
        .submitter(signal)
        .submit_report(record_id, dispatch, mode)
        .await?;
    println!("{}", describe_submission(&submission));
    Ok(())
}

/// Normalize recipients: trimmed, deduplicated, at least one.
pub(crate) fn build_dispatch(emails: Vec<String>, notes: Option<String>) -> Result<ReportDispatch> {
    let mut client_emails: Vec<String> = Vec::new();
    for email in emails {
        let email = email.trim();
        if !email.is_empty() && !client_emails.iter().any(|e| e.eq_ignore_ascii_case(email)) {
            client_emails.push(email.to_string());
        }
    }
    if client_emails.is_empty() {
        return Err(Error::FieldRequired { field: "recipient email" });
    }
    let notes = notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    Ok(ReportDispatch {
        client_emails,
        notes,
    })
}

#[cfg(test)]
#[path = "send_tests.rs"]
mod tests;
