// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use std::path::PathBuf;

use clap::Args;
use rp_core::{FileCategory, DEFAULT_SERVICE_TYPE};

/// Parse a file category name (photo, signature, pdf, xlsx).
pub fn parse_category(s: &str) -> Result<FileCategory, String> {
    s.parse().map_err(|e: rp_core::Error| e.to_string())
}

/// Delivery control shared by every write command.
#[derive(Args, Clone, Debug, Default)]
pub struct DeliveryArgs {
    /// Queue the write without trying the network
    #[arg(long)]
    pub offline: bool,
}

/// Details of a service visit.
#[derive(Args, Clone, Debug, Default)]
pub struct VisitArgs {
    /// Client name
    #[arg(long)]
    pub client: Option<String>,

    /// Client id known to the server
    #[arg(long, value_name = "ID")]
    pub client_id: Option<String>,

    /// Client contact email
    #[arg(long, value_name = "EMAIL")]
    pub client_email: Option<String>,

    /// Client contact phone
    #[arg(long, value_name = "PHONE")]
    pub client_phone: Option<String>,

    /// Site name
    #[arg(long)]
    pub site: Option<String>,

    /// Site id known to the server
    #[arg(long, value_name = "ID")]
    pub site_id: Option<String>,

    /// Site address
    #[arg(long)]
    pub address: Option<String>,

    /// Technician id
    #[arg(long, value_name = "ID")]
    pub tech: Option<String>,

    /// Kind of visit
    #[arg(long = "type", short = 't', default_value = DEFAULT_SERVICE_TYPE)]
    pub service_type: String,

    /// Visit notes
    #[arg(long, short)]
    pub notes: Option<String>,

    /// Visit date (ISO 8601); defaults to now on the server
    #[arg(long)]
    pub date: Option<String>,
}

/// Files captured during a visit.
#[derive(Args, Clone, Debug, Default)]
pub struct CaptureArgs {
    /// Site photo (repeatable)
    #[arg(long, value_name = "PATH")]
    pub photo: Vec<PathBuf>,

    /// PDF/XLSX export or extra image, category inferred (repeatable)
    #[arg(long, value_name = "PATH")]
    pub attach: Vec<PathBuf>,

    /// Customer signature image
    #[arg(long, value_name = "PATH")]
    pub signature: Option<PathBuf>,
}
