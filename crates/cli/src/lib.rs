// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reporta - an offline-first field service reporting client.
//!
//! This crate provides the functionality behind the `reporta` CLI: writes
//! against the service API (visits, file uploads, report dispatch) are
//! delivered right away when the API is reachable and otherwise kept in a
//! durable outbox that is replayed in order once connectivity returns.
//!
//! # Main Components
//!
//! - [`submit::Submitter`] - deliver-or-queue entry point for every write
//! - [`sync`] - drain passes, single-flight runner, reachability and scheduling
//! - [`auth::Session`] - bearer credentials with transparent refresh
//! - [`remote::Remote`] - the service API seam, with [`remote::HttpRemote`]
//! - [`Config`] - per-directory configuration under `.reporta/`
//!
//! # Usage
//!
//! ```rust,ignore
//! use reporta::{auth, remote, submit, sync};
//!
//! let outbox = sync::shared(rp_core::Outbox::open(&path)?);
//! let remote = Arc::new(remote::HttpRemote::new(&api_url, timeout)?);
//! let session = Arc::new(auth::Session::new(remote, auth::CredentialStore::new(creds))?);
//! let signal = sync::ReachabilitySignal::new(true);
//!
//! let submitter = submit::Submitter::new(outbox, session, signal);
//! submitter.submit_report("svc_12", dispatch, submit::DeliveryMode::Auto).await?;
//! ```

mod cli;
pub mod colors;
mod commands;
pub mod help;

pub mod auth;
pub mod config;
pub mod env;
pub mod error;
pub mod id;
pub mod remote;
pub mod submit;
pub mod sync;

pub use cli::{
    AuthCommand, CaptureArgs, Cli, Command, DeliveryArgs, OutputFormat, QuarantineCommand,
    VisitArgs,
};
pub use config::{find_work_dir, init_work_dir, Config};
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Run a parsed command.
pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::New {
            visit,
            capture,
            delivery,
            output,
        } => commands::new::run(visit, capture, delivery, output).await,
        Command::Upload {
            service_id,
            path,
            kind,
            delivery,
        } => commands::upload::run(service_id, path, kind, delivery).await,
        Command::Send {
            service_id,
            emails,
            notes,
            delivery,
        } => commands::send::run(service_id, emails, notes, delivery).await,
        Command::Pending { output } => commands::pending::run(output),
        Command::Sync { quiet } => commands::sync::run(quiet).await,
        Command::Watch => commands::watch::run().await,
        Command::Quarantine(cmd) => match cmd {
            QuarantineCommand::List { output } => commands::quarantine::list(output),
            QuarantineCommand::Restore { ids } => commands::quarantine::restore(ids),
        },
        Command::Init { api_url, path } => commands::init::run(api_url, path),
        Command::Auth(cmd) => match cmd {
            AuthCommand::Set { access, refresh } => commands::auth::set(access, refresh),
            AuthCommand::Clear => commands::auth::clear(),
            AuthCommand::Status => commands::auth::status(),
        },
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "reporta", &mut std::io::stdout());
            Ok(())
        }
    }
}
