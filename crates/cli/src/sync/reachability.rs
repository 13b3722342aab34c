// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Online/offline signal and the health probe feeding it.
//!
//! The signal is decoupled from whatever observes the network, so tests can
//! flip it directly. In production [`HealthProbe`] polls `GET /health`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::remote::Remote;

/// Current reachability of the API, with change notification.
#[derive(Debug, Clone)]
pub struct ReachabilitySignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ReachabilitySignal {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        ReachabilitySignal { tx: Arc::new(tx) }
    }

    /// Update the state; returns true if it changed.
    ///
    /// Subscribers are only woken on an actual change.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                return false;
            }
            *current = online;
            true
        });
        if changed {
            info!(online, "reachability changed");
        }
        changed
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// A receiver that observes every future change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Call `handler` with the new state after every change.
    ///
    /// The returned task runs until aborted.
    pub fn on_change<F>(&self, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(bool) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                handler(online);
            }
        })
    }
}

/// Periodically checks the API and feeds a [`ReachabilitySignal`].
pub struct HealthProbe<R> {
    remote: Arc<R>,
    signal: ReachabilitySignal,
    interval: Duration,
}

impl<R: Remote> HealthProbe<R> {
    pub fn new(remote: Arc<R>, signal: ReachabilitySignal, interval: Duration) -> Self {
        HealthProbe { remote, signal, interval }
    }

    /// Probe once and publish the result; returns the resulting state.
    ///
    /// Only transient failures count as offline: a server that answers with
    /// an error is still reachable.
    pub async fn probe_once(&self) -> bool {
        match self.remote.health().await {
            Ok(()) => {
                self.signal.set_online(true);
            }
            Err(e) if e.is_transient() => {
                debug!(error = %e, "health probe failed");
                self.signal.set_online(false);
            }
            Err(e) => {
                debug!(error = %e, "health probe answered with an error");
                self.signal.set_online(true);
            }
        }
        self.signal.is_online()
    }

    /// Probe every `interval` until cancelled. The first probe is immediate.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {
                    self.probe_once().await;
                }
            }
        }
    }
}
