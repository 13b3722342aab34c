// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger source for drain passes.
//!
//! Passes are started on process start while online, on every offline to
//! online transition, and on a fixed interval while online. Each pass runs
//! in its own task so triggers keep being observed (and dropped by the
//! runner) while it is in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::reachability::ReachabilitySignal;
use super::runner::{SyncRunner, Trigger, TriggerOutcome};
use crate::remote::Remote;

pub struct Scheduler<R> {
    runner: Arc<SyncRunner<R>>,
    signal: ReachabilitySignal,
    interval: Duration,
}

impl<R: Remote + 'static> Scheduler<R> {
    pub fn new(runner: Arc<SyncRunner<R>>, signal: ReachabilitySignal, interval: Duration) -> Self {
        Scheduler { runner, signal, interval }
    }

    /// Fire triggers until `cancel` is cancelled.
    ///
    /// Cancellation stops new triggers only; a pass already in flight is
    /// awaited before returning.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut reachability = self.signal.subscribe();
        let mut online = *reachability.borrow_and_update();
        let mut passes = JoinSet::new();

        if online {
            self.spawn_pass(&mut passes, Trigger::Startup);
        } else {
            info!("offline at startup, waiting for connectivity");
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = reachability.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let now_online = *reachability.borrow_and_update();
                    if now_online && !online {
                        self.spawn_pass(&mut passes, Trigger::Reconnected);
                    }
                    online = now_online;
                }
                _ = ticker.tick() => {
                    if online {
                        self.spawn_pass(&mut passes, Trigger::Interval);
                    }
                }
                Some(joined) = passes.join_next() => log_outcome(joined),
            }
        }

        debug!("scheduler stopping");
        while let Some(joined) = passes.join_next().await {
            log_outcome(joined);
        }
    }

    fn spawn_pass(&self, passes: &mut JoinSet<TriggerOutcome>, trigger: Trigger) {
        let runner = Arc::clone(&self.runner);
        passes.spawn(async move { runner.try_drain(trigger).await });
    }
}

fn log_outcome(joined: Result<TriggerOutcome, JoinError>) {
    match joined {
        Ok(TriggerOutcome::Completed(report)) if report.is_complete() => {
            debug!(delivered = report.delivered, "pass complete");
        }
        Ok(TriggerOutcome::Completed(report)) => {
            debug!(remaining = report.remaining, stopped = ?report.stopped, "pass stopped early");
        }
        Ok(TriggerOutcome::Skipped) => {}
        Err(e) => warn!(error = %e, "drain task failed"),
    }
}
