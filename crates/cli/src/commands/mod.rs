// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod auth;
pub mod init;
pub mod new;
pub mod pending;
pub mod quarantine;
pub mod send;
pub mod sync;
pub mod upload;
pub mod watch;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use rp_core::Outbox;
use serde::Serialize;

use crate::auth::{CredentialStore, Session};
use crate::colors;
use crate::config::{credentials_path, find_work_dir, lock_path, outbox_path, Config};
use crate::env;
use crate::error::{Error, Result};
use crate::remote::{HttpRemote, Remote};
use crate::submit::{DeliveryMode, Submission, Submitter};
use crate::sync::{shared, HealthProbe, ReachabilitySignal, SharedOutbox};

/// Everything a networked command needs.
pub struct Context {
    pub work_dir: PathBuf,
    pub config: Config,
    pub outbox: SharedOutbox,
    pub session: Arc<Session<HttpRemote>>,
}

impl Context {
    /// The remote behind the session.
    pub fn remote(&self) -> Arc<HttpRemote> {
        Arc::clone(self.session.remote())
    }

    /// A submitter sharing this context's outbox and session.
    pub fn submitter(&self, signal: ReachabilitySignal) -> Submitter<HttpRemote> {
        Submitter::new(self.outbox.clone(), Arc::clone(&self.session), signal)
    }
}

/// Open the outbox of the current directory without touching the network.
pub fn open_outbox() -> Result<(Outbox, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let outbox = Outbox::open(&outbox_path(&work_dir))?;
    Ok((outbox, config, work_dir))
}

/// Open the outbox, the HTTP client and the stored credentials.
pub fn open_context() -> Result<Context> {
    let (outbox, config, work_dir) = open_outbox()?;
    let api_url = config.effective_api_url()?;
    let remote = HttpRemote::new(&api_url, config.sync.request_timeout())?;
    let session = Session::new(Arc::new(remote), CredentialStore::new(credentials_path(&work_dir)))?;
    Ok(Context {
        work_dir,
        config,
        outbox: shared(outbox),
        session: Arc::new(session),
    })
}

/// Resolve the delivery mode from the `--offline` flag and `REPORTA_OFFLINE`.
pub fn delivery_mode(offline_flag: bool) -> DeliveryMode {
    if offline_flag || env::force_offline() {
        DeliveryMode::Offline
    } else {
        DeliveryMode::Auto
    }
}

/// Reachability as seen right now: one health probe unless offline is forced.
pub async fn reachability<R: Remote>(
    remote: Arc<R>,
    mode: DeliveryMode,
    config: &Config,
) -> ReachabilitySignal {
    let signal = ReachabilitySignal::new(false);
    if mode == DeliveryMode::Auto {
        HealthProbe::new(remote, signal.clone(), config.sync.probe_interval())
            .probe_once()
            .await;
    }
    signal
}

/// Human-readable line for a submission outcome.
pub fn describe_submission(submission: &Submission) -> String {
    match submission {
        Submission::Delivered { record_id } => {
            format!("{} {}", colors::delivered("delivered"), record_id)
        }
        Submission::Queued { entry_id } => format!(
            "{} as entry {} (will sync when online)",
            colors::queued("queued"),
            entry_id
        ),
        Submission::Partial { record_id, queued } => format!(
            "{} {}, {} {} file(s) for later",
            colors::delivered("delivered"),
            record_id,
            colors::queued("queued"),
            queued.len()
        ),
    }
}

/// JSON form of a submission outcome.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionJson {
    Delivered { record_id: String },
    Queued { entry_id: i64 },
    Partial { record_id: String, queued: Vec<i64> },
}

impl From<&Submission> for SubmissionJson {
    fn from(submission: &Submission) -> Self {
        match submission {
            Submission::Delivered { record_id } => SubmissionJson::Delivered {
                record_id: record_id.clone(),
            },
            Submission::Queued { entry_id } => SubmissionJson::Queued {
                entry_id: *entry_id,
            },
            Submission::Partial { record_id, queued } => SubmissionJson::Partial {
                record_id: record_id.clone(),
                queued: queued.clone(),
            },
        }
    }
}

/// Take the per-directory sync lock, failing if another process holds it.
pub fn acquire_lock(work_dir: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path(work_dir))?;
    file.try_lock_exclusive()
        .map_err(|_| Error::SyncInProgress)?;
    Ok(file)
}

/// Format a millisecond timestamp for listings.
pub(crate) fn format_timestamp(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Suffix completing "entr" for a count.
pub(crate) fn entry_suffix(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
