// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated access to a [`Remote`] with transparent credential refresh.
//!
//! Every call is made with the current access token. When the server
//! answers that the token expired, the session renews it once through the
//! refresh endpoint and retries the call exactly once. Concurrent callers
//! that hit the same expired token share a single refresh.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use rp_core::{Attachment, ReportDispatch, ServiceCreateRequest};

use super::CredentialStore;
use crate::error::Result;
use crate::remote::{Credentials, FileRef, RecordRef, Remote, RemoteError, RemoteResult};

/// Credential-aware wrapper around a [`Remote`].
pub struct Session<R> {
    remote: Arc<R>,
    store: CredentialStore,
    current: RwLock<Option<Credentials>>,
    /// Serializes refresh exchanges and holds the outcome of the last failed one.
    refresh_lock: tokio::sync::Mutex<Option<RemoteError>>,
    /// Number of refresh exchanges attempted so far.
    refresh_attempts: AtomicU64,
}

impl<R: Remote> Session<R> {
    /// Create a session, loading the stored credentials.
    pub fn new(remote: Arc<R>, store: CredentialStore) -> Result<Self> {
        let current = store.load()?;
        Ok(Session {
            remote,
            store,
            current: RwLock::new(current),
            refresh_lock: tokio::sync::Mutex::new(None),
            refresh_attempts: AtomicU64::new(0),
        })
    }

    /// The underlying remote.
    pub fn remote(&self) -> &Arc<R> {
        &self.remote
    }

    /// Credentials currently in use.
    pub fn credentials(&self) -> Option<Credentials> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns true if a credential pair is available.
    pub fn is_authenticated(&self) -> bool {
        self.credentials().is_some()
    }

    fn set_credentials(&self, creds: Credentials) {
        match self.current.write() {
            Ok(mut guard) => *guard = Some(creds),
            Err(poisoned) => *poisoned.into_inner() = Some(creds),
        }
    }

    fn access_token(&self) -> RemoteResult<String> {
        self.credentials()
            .map(|c| c.access_token)
            .ok_or_else(|| RemoteError::Unauthorized("no stored credentials".into()))
    }

    /// Create a service record.
    pub async fn create_record(&self, request: &ServiceCreateRequest) -> RemoteResult<RecordRef> {
        self.with_auth(|token| async move { self.remote.create_record(&token, request).await })
            .await
    }

    /// Upload one file to an existing record.
    pub async fn upload_file(&self, record_id: &str, attachment: &Attachment) -> RemoteResult<FileRef> {
        self.with_auth(|token| async move {
            self.remote.upload_file(&token, record_id, attachment).await
        })
        .await
    }

    /// Sign a record and email its report.
    pub async fn send_report(&self, record_id: &str, dispatch: &ReportDispatch) -> RemoteResult<()> {
        self.with_auth(|token| async move {
            self.remote.send_report(&token, record_id, dispatch).await
        })
        .await
    }

    /// Run `call` with the current token, refreshing and retrying once on expiry.
    async fn with_auth<T, F, Fut>(&self, call: F) -> RemoteResult<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let token = self.access_token()?;
        let seen_attempts = self.refresh_attempts.load(Ordering::Acquire);
        match call(token.clone()).await {
            Err(RemoteError::AuthExpired) => {
                debug!("access token expired, refreshing");
                let fresh = self.refresh_after(&token, seen_attempts).await?;
                match call(fresh).await {
                    Err(RemoteError::AuthExpired) => Err(RemoteError::Unauthorized(
                        "access token rejected right after refresh".into(),
                    )),
                    result => result,
                }
            }
            result => result,
        }
    }

    /// Renew the access token that the caller saw expire.
    ///
    /// Returns the token to retry with. If another caller already replaced
    /// `stale`, its result is reused and no exchange happens.
    pub async fn refresh(&self, stale: &str) -> RemoteResult<String> {
        let seen_attempts = self.refresh_attempts.load(Ordering::Acquire);
        self.refresh_after(stale, seen_attempts).await
    }

    /// Refresh on behalf of a caller that observed `seen_attempts` exchanges
    /// before its call failed.
    ///
    /// A caller that waited on an exchange started after that point shares
    /// its outcome, success or failure, instead of issuing another one.
    async fn refresh_after(&self, stale: &str, seen_attempts: u64) -> RemoteResult<String> {
        let mut last_failure = self.refresh_lock.lock().await;

        let current = self
            .credentials()
            .ok_or_else(|| RemoteError::Unauthorized("no stored credentials".into()))?;
        if current.access_token != stale {
            debug!("credentials already refreshed by a concurrent call");
            return Ok(current.access_token);
        }
        if self.refresh_attempts.load(Ordering::Acquire) != seen_attempts {
            if let Some(err) = last_failure.as_ref() {
                debug!(error = %err, "reusing outcome of a concurrent refresh");
                return Err(err.clone());
            }
        }

        self.refresh_attempts.fetch_add(1, Ordering::AcqRel);
        let outcome = match self.remote.refresh_credentials(&current.refresh_token).await {
            Ok(fresh) => {
                if let Err(e) = self.store.save(&fresh) {
                    warn!(error = %e, path = %self.store.path().display(), "failed to persist refreshed credentials");
                }
                let token = fresh.access_token.clone();
                self.set_credentials(fresh);
                info!("access token refreshed");
                Ok(token)
            }
            Err(e) if e.is_transient() => Err(e),
            Err(e) => {
                warn!(error = %e, "credential refresh failed");
                Err(RemoteError::Unauthorized(format!("credential refresh failed: {e}")))
            }
        };
        *last_failure = outcome.as_ref().err().cloned();
        outcome
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
