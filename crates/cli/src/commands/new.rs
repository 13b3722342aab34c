// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rp_core::{Attachment, FileCategory, PendingAttachments, ServiceCreateRequest};
use tracing::debug;

use crate::cli::{CaptureArgs, DeliveryArgs, OutputFormat, VisitArgs};
use crate::error::Result;
use crate::id::new_service_uid;

use super::{delivery_mode, describe_submission, open_context, reachability, SubmissionJson};

pub async fn run(
    visit: VisitArgs,
    capture: CaptureArgs,
    delivery: DeliveryArgs,
    output: OutputFormat,
) -> Result<()> {
    let ctx = open_context()?;
    let request = build_request(&visit);
    let attachments = read_attachments(&capture)?;
    debug!(
        service_uid = %request.service_uid,
        files = attachments.len(),
        "recording service visit"
    );

    let mode = delivery_mode(delivery.offline);
    let signal = reachability(ctx.remote(), mode, &ctx.config).await;
    let submission = ctx
        .submitter(signal)
        .submit_service(request, attachments, mode)
        .await?;

    match output {
        OutputFormat::Text => println!("{}", describe_submission(&submission)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&SubmissionJson::from(&submission))?)
        }
    }
    Ok(())
}

/// Build the create request, trimming blank fields away.
pub(crate) fn build_request(visit: &VisitArgs) -> ServiceCreateRequest {
    let clean = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    let seed = [&visit.client, &visit.site]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect::<Vec<_>>()
        .join("/");

    let mut request = ServiceCreateRequest::new(new_service_uid(&seed));
    request.tech_id = clean(&visit.tech);
    request.client_id = clean(&visit.client_id);
    request.client_name = clean(&visit.client);
    request.client_email = clean(&visit.client_email);
    request.client_phone = clean(&visit.client_phone);
    request.site_id = clean(&visit.site_id);
    request.site_name = clean(&visit.site);
    request.site_address = clean(&visit.address);
    request.notes = clean(&visit.notes);
    request.date = clean(&visit.date);
    let service_type = visit.service_type.trim();
    if !service_type.is_empty() {
        request.service_type = service_type.to_string();
    }
    request
}

/// Read every captured file into memory.
pub(crate) fn read_attachments(capture: &CaptureArgs) -> Result<PendingAttachments> {
    let photos = capture
        .photo
        .iter()
        .map(|path| Attachment::read(path, Some(FileCategory::Photo)))
        .collect::<rp_core::Result<Vec<_>>>()?;
    let attachments = capture
        .attach
        .iter()
        .map(|path| Attachment::read(path, None))
        .collect::<rp_core::Result<Vec<_>>>()?;
    let signature = capture
        .signature
        .as_deref()
        .map(|path| Attachment::read(path, Some(FileCategory::Signature)))
        .transpose()?;
    Ok(PendingAttachments {
        photos,
        attachments,
        signature,
    })
}

#[cfg(test)]
#[path = "new_tests.rs"]
mod tests;
