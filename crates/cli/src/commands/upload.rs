// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use rp_core::{Attachment, FileCategory};

use crate::cli::DeliveryArgs;
use crate::error::{Error, Result};

use super::{delivery_mode, describe_submission, open_context, reachability};

pub async fn run(
    service_id: String,
    path: PathBuf,
    kind: Option<FileCategory>,
    delivery: DeliveryArgs,
) -> Result<()> {
    let record_id = require_record_id(&service_id)?;
    let attachment = Attachment::read(&path, kind)?;

    let ctx = open_context()?;
    let mode = delivery_mode(delivery.offline);
    let signal = reachability(ctx.remote(), mode, &ctx.config).await;
    let submission = ctx
        .submitter(signal)
        .submit_upload(record_id, attachment, mode)
        .await?;
    println!("{}", describe_submission(&submission));
    Ok(())
}

/// Trimmed server record id; blank ids are rejected before anything is queued.
pub(crate) fn require_record_id(service_id: &str) -> Result<&str> {
    let trimmed = service_id.trim();
    if trimmed.is_empty() {
        return Err(Error::FieldRequired { field: "service id" });
    }
    Ok(trimmed)
}
