// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! At-most-one drain pass per process.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::drain::{drain_pass, DrainOptions, PassReport};
use super::SharedOutbox;
use crate::auth::Session;
use crate::remote::Remote;

/// What asked for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Process start while online.
    Startup,
    /// Offline to online transition.
    Reconnected,
    /// Periodic timer while online.
    Interval,
    /// Explicit request (`reporta sync`).
    Manual,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trigger::Startup => "startup",
            Trigger::Reconnected => "reconnected",
            Trigger::Interval => "interval",
            Trigger::Manual => "manual",
        };
        write!(f, "{}", s)
    }
}

/// Result of a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A pass ran to its end (which may be a stop on failure).
    Completed(PassReport),
    /// Another pass was in flight; the trigger was dropped.
    Skipped,
}

/// Owns the drain dependencies and guarantees passes never overlap.
pub struct SyncRunner<R> {
    outbox: SharedOutbox,
    session: Arc<Session<R>>,
    options: DrainOptions,
    running: AtomicBool,
}

impl<R: Remote> SyncRunner<R> {
    pub fn new(outbox: SharedOutbox, session: Arc<Session<R>>, options: DrainOptions) -> Self {
        SyncRunner { outbox, session, options, running: AtomicBool::new(false) }
    }

    pub fn outbox(&self) -> &SharedOutbox {
        &self.outbox
    }

    pub fn session(&self) -> &Arc<Session<R>> {
        &self.session
    }

    /// Returns true while a pass is in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run a pass unless one is already running.
    ///
    /// Triggers are never queued: a trigger arriving during a pass is
    /// answered with [`TriggerOutcome::Skipped`].
    pub async fn try_drain(&self, trigger: Trigger) -> TriggerOutcome {
        if self.running.swap(true, Ordering::AcqRel) {
            debug!(%trigger, "drain pass already running, trigger dropped");
            return TriggerOutcome::Skipped;
        }
        let _running = RunningGuard(&self.running);

        debug!(%trigger, "drain triggered");
        TriggerOutcome::Completed(drain_pass(&self.outbox, &self.session, &self.options).await)
    }
}

/// Clears the running flag even if the pass future is dropped mid-flight.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
