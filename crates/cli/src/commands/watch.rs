// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running delivery: probe reachability and drain on every trigger
//! until interrupted.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::env;
use crate::error::Result;
use crate::remote::Remote;
use crate::sync::{DrainOptions, HealthProbe, ReachabilitySignal, Scheduler, SyncRunner};

use super::{acquire_lock, open_context};

pub async fn run() -> Result<()> {
    let ctx = open_context()?;
    let _lock = acquire_lock(&ctx.work_dir)?;

    let signal = ReachabilitySignal::new(false);
    let runner = Arc::new(SyncRunner::new(
        ctx.outbox.clone(),
        Arc::clone(&ctx.session),
        DrainOptions::from(&ctx.config.sync),
    ));
    let probe = if env::force_offline() {
        info!("offline forced, reachability probe disabled");
        None
    } else {
        Some(HealthProbe::new(ctx.remote(), signal.clone(), ctx.config.sync.probe_interval()))
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for interrupt");
            return;
        }
        info!("interrupt received, stopping");
        interrupt.cancel();
    });

    println!(
        "Watching {} (interval {}s, Ctrl-C to stop)",
        ctx.work_dir.display(),
        ctx.config.sync.interval().as_secs()
    );
    info!(work_dir = %ctx.work_dir.display(), "watch started");
    serve(runner, probe, signal, ctx.config.sync.interval(), cancel).await;
    info!("watch stopped");
    Ok(())
}

/// Probe once so the scheduler starts with a known state, then keep probing
/// and draining until `cancel` fires.
pub(crate) async fn serve<R: Remote + 'static>(
    runner: Arc<SyncRunner<R>>,
    probe: Option<HealthProbe<R>>,
    signal: ReachabilitySignal,
    interval: Duration,
    cancel: CancellationToken,
) {
    let probe_task = match probe {
        Some(probe) => {
            probe.probe_once().await;
            let probe_cancel = cancel.clone();
            Some(tokio::spawn(async move { probe.run(probe_cancel).await }))
        }
        None => None,
    };

    Scheduler::new(runner, signal, interval).run(cancel.clone()).await;

    cancel.cancel();
    if let Some(task) = probe_task {
        if let Err(e) = task.await {
            warn!(error = %e, "probe task failed");
        }
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
