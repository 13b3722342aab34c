// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use rp_core::{EntryId, FileCategory};

pub use args::{parse_category, CaptureArgs, DeliveryArgs, VisitArgs};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "reporta")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first field service reporting client")]
#[command(
    long_about = "Offline-first field service reporting client.\n\n\
    Service visits, files and reports are delivered right away when the API is \
    reachable and queued in a local outbox otherwise. Queued writes are replayed \
    in order once connectivity returns."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
pub struct Cli {
    /// Run as if reporta was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Service visits
    // ─────────────────────────────────────────────────────────────────────────
    /// Record a service visit with its photos, documents and signature
    #[command(after_help = colors::examples("\
Examples:
  reporta new --client Acme --site Plant                Visit without files
  reporta new --client Acme --photo a.jpg --photo b.jpg  Visit with photos
  reporta new --client Acme --signature sig.png          Signed visit
  reporta new --client Acme --attach report.pdf          Visit with a PDF export
  reporta new --client Acme --offline                    Queue without trying the network"))]
    New {
        #[command(flatten)]
        visit: VisitArgs,

        #[command(flatten)]
        capture: CaptureArgs,

        #[command(flatten)]
        delivery: DeliveryArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Upload a file to an existing service record
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  reporta upload svc_12 photo.jpg              Upload a photo
  reporta upload svc_12 sig.png -k signature   Upload a signature")
    )]
    Upload {
        /// Server id of the service record
        service_id: String,

        /// File to upload
        path: PathBuf,

        /// File category (photo, signature, pdf, xlsx); inferred when omitted
        #[arg(long, short, value_parser = parse_category)]
        kind: Option<FileCategory>,

        #[command(flatten)]
        delivery: DeliveryArgs,
    },

    /// Sign a service record and email its report
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  reporta send svc_12 -e ops@acme.com                  Email one recipient
  reporta send svc_12 -e a@acme.com -e b@acme.com      Email two recipients")
    )]
    Send {
        /// Server id of the service record
        service_id: String,

        /// Recipient email (repeatable)
        #[arg(long = "email", short = 'e', required = true, value_name = "EMAIL")]
        emails: Vec<String>,

        /// Notes added to the report
        #[arg(long, short)]
        notes: Option<String>,

        #[command(flatten)]
        delivery: DeliveryArgs,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Outbox
    // ─────────────────────────────────────────────────────────────────────────
    /// List writes waiting for delivery, in replay order
    Pending {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Deliver queued writes now
    Sync {
        /// Only print errors
        #[arg(long, short)]
        quiet: bool,
    },

    /// Keep delivering queued writes whenever the API is reachable
    #[command(after_help = colors::examples("\
Examples:
  reporta watch                     Run until interrupted
  RUST_LOG=debug reporta watch      Verbose log in .reporta/sync.log"))]
    Watch,

    /// Inspect or restore entries held after repeated rejections
    #[command(subcommand)]
    Quarantine(QuarantineCommand),

    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize a reporta directory
    #[command(after_help = colors::examples("\
Examples:
  reporta init --api-url https://api.example.com              In the current directory
  reporta init --api-url https://api.example.com --path <dir>  In another directory"))]
    Init {
        /// Base URL of the service API
        #[arg(long, value_name = "URL")]
        api_url: String,

        /// Directory to initialize (defaults to the current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Manage stored credentials
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Generate shell completions
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  reporta completion bash > ~/.local/share/bash-completion/completions/reporta
  reporta completion zsh > ~/.zfunc/_reporta")
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Credential management commands.
#[derive(Subcommand)]
pub enum AuthCommand {
    /// Store an access/refresh token pair
    #[command(arg_required_else_help = true)]
    Set {
        /// Access token sent as bearer on every call
        #[arg(long)]
        access: String,

        /// Refresh token used to renew the access token
        #[arg(long)]
        refresh: String,
    },
    /// Remove stored credentials
    Clear,
    /// Show whether credentials are stored
    Status,
}

/// Quarantine commands.
#[derive(Subcommand)]
pub enum QuarantineCommand {
    /// List held entries with the error that held them
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Put held entries back in the queue at their original position
    #[command(arg_required_else_help = true)]
    Restore {
        /// Entry id(s)
        #[arg(required = true)]
        ids: Vec<EntryId>,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
