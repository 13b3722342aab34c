// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Outbox replay against the service API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Scheduler   │────►│ SyncRunner  │────►│ drain_pass  │
//! │ (triggers)   │     │ (1 at once) │     │  (ordered)  │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!        ▲                                    │      │
//!        │                                    ▼      ▼
//! ┌──────────────┐                      ┌────────┐ ┌─────────┐
//! │ Reachability │◄── HealthProbe       │ Outbox │ │ Session │
//! │   Signal     │                      └────────┘ └─────────┘
//! └──────────────┘
//! ```
//!
//! # Features
//!
//! - Strict replay order; the first failing entry blocks the rest of a pass
//! - Resumable composite entries (record creation and uploads tracked apart)
//! - At most one pass in flight; triggers arriving meanwhile are dropped
//! - Drains on startup, on reconnection and periodically while online
//! - Opt-in quarantine for entries that keep failing permanently

mod drain;
mod reachability;
mod runner;
mod scheduler;

pub use drain::{drain_pass, DrainOptions, PassReport, StopReason};
pub use reachability::{HealthProbe, ReachabilitySignal};
pub use runner::{SyncRunner, Trigger, TriggerOutcome};
pub use scheduler::Scheduler;

use std::sync::{Arc, Mutex};

use rp_core::Outbox;

/// Outbox shared between the write path and the drain loop.
///
/// The lock is only ever taken inside synchronous helpers, never across an
/// `.await`.
pub type SharedOutbox = Arc<Mutex<Outbox>>;

/// Wrap an outbox for sharing.
pub fn shared(outbox: Outbox) -> SharedOutbox {
    Arc::new(Mutex::new(outbox))
}

/// Run `f` with exclusive access to the outbox.
pub fn with_outbox<T>(
    outbox: &SharedOutbox,
    f: impl FnOnce(&mut Outbox) -> rp_core::Result<T>,
) -> rp_core::Result<T> {
    // A panic while holding the lock cannot leave SQLite half-written
    let mut guard = match outbox.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    f(&mut guard)
}

#[cfg(test)]
pub(crate) mod test_helpers;
