// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mock remote for testing without a server.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rp_core::{Attachment, FileCategory, ReportDispatch, ServiceCreateRequest};

use super::{Credentials, FileRef, RecordRef, Remote, RemoteError, RemoteFuture, RemoteResult};
use crate::auth::{CredentialStore, Session};

/// A call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { token: String, service_uid: String },
    Upload { token: String, record_id: String, file_name: String, category: FileCategory },
    Report { token: String, record_id: String },
    Refresh { refresh_token: String },
    Health,
}

/// Scriptable [`Remote`] that records every call.
///
/// Unscripted calls succeed. Record ids are handed out as `svc_1`, `svc_2`,
/// ... and refreshed access tokens as `access-1`, `access-2`, ...
pub struct MockRemote {
    calls: Mutex<Vec<Call>>,
    create_results: Mutex<VecDeque<RemoteResult<RecordRef>>>,
    upload_failures: Mutex<HashMap<String, VecDeque<RemoteError>>>,
    report_results: Mutex<VecDeque<RemoteResult<()>>>,
    refresh_results: Mutex<VecDeque<RemoteError>>,
    /// Token accepted by authenticated calls; `None` accepts any.
    valid_token: Mutex<Option<String>>,
    healthy: AtomicBool,
    delay: Mutex<Option<Duration>>,
    records: AtomicU32,
    refreshes: AtomicU32,
}

impl MockRemote {
    pub fn new() -> Self {
        MockRemote {
            calls: Mutex::new(Vec::new()),
            create_results: Mutex::new(VecDeque::new()),
            upload_failures: Mutex::new(HashMap::new()),
            report_results: Mutex::new(VecDeque::new()),
            refresh_results: Mutex::new(VecDeque::new()),
            valid_token: Mutex::new(None),
            healthy: AtomicBool::new(true),
            delay: Mutex::new(None),
            records: AtomicU32::new(0),
            refreshes: AtomicU32::new(0),
        }
    }

    /// All calls seen so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of refresh exchanges seen so far.
    pub fn refresh_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Refresh { .. })).count()
    }

    /// Number of record creations seen so far.
    pub fn create_count(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Create { .. })).count()
    }

    /// Names of uploaded files, in order, with the record they targeted.
    pub fn uploads(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Upload { record_id, file_name, .. } => Some((record_id, file_name)),
                _ => None,
            })
            .collect()
    }

    /// Script the outcome of the next create call.
    pub fn push_create(&self, result: RemoteResult<RecordRef>) {
        self.create_results.lock().unwrap().push_back(result);
    }

    /// Script a failure for the next upload of `file_name`.
    pub fn fail_upload(&self, file_name: &str, err: RemoteError) {
        self.upload_failures
            .lock()
            .unwrap()
            .entry(file_name.to_string())
            .or_default()
            .push_back(err);
    }

    /// Script the outcome of the next report call.
    pub fn push_report(&self, result: RemoteResult<()>) {
        self.report_results.lock().unwrap().push_back(result);
    }

    /// Script a failure for the next refresh exchange.
    pub fn fail_refresh(&self, err: RemoteError) {
        self.refresh_results.lock().unwrap().push_back(err);
    }

    /// Only accept `token` on authenticated calls.
    pub fn accept_only(&self, token: &str) {
        *self.valid_token.lock().unwrap() = Some(token.to_string());
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Delay every call, widening race windows.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_token(&self, token: &str) -> RemoteResult<()> {
        match self.valid_token.lock().unwrap().as_deref() {
            Some(valid) if valid != token => Err(RemoteError::AuthExpired),
            _ => Ok(()),
        }
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl Remote for MockRemote {
    fn create_record<'a>(
        &'a self,
        token: &'a str,
        request: &'a ServiceCreateRequest,
    ) -> RemoteFuture<'a, RecordRef> {
        Box::pin(async move {
            self.record(Call::Create {
                token: token.to_string(),
                service_uid: request.service_uid.clone(),
            });
            self.pause().await;
            self.check_token(token)?;
            let scripted = self.create_results.lock().unwrap().pop_front();
            match scripted {
                Some(result) => result,
                None => {
                    let n = self.records.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok(RecordRef { id: format!("svc_{n}") })
                }
            }
        })
    }

    fn upload_file<'a>(
        &'a self,
        token: &'a str,
        record_id: &'a str,
        attachment: &'a Attachment,
    ) -> RemoteFuture<'a, FileRef> {
        Box::pin(async move {
            self.record(Call::Upload {
                token: token.to_string(),
                record_id: record_id.to_string(),
                file_name: attachment.file_name.clone(),
                category: attachment.category,
            });
            self.pause().await;
            self.check_token(token)?;
            let failure = self
                .upload_failures
                .lock()
                .unwrap()
                .get_mut(&attachment.file_name)
                .and_then(VecDeque::pop_front);
            match failure {
                Some(err) => Err(err),
                None => Ok(FileRef { id: format!("file_{}", attachment.file_name), url: None }),
            }
        })
    }

    fn send_report<'a>(
        &'a self,
        token: &'a str,
        record_id: &'a str,
        _dispatch: &'a ReportDispatch,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Report { token: token.to_string(), record_id: record_id.to_string() });
            self.pause().await;
            self.check_token(token)?;
            let scripted = self.report_results.lock().unwrap().pop_front();
            scripted.unwrap_or(Ok(()))
        })
    }

    fn refresh_credentials<'a>(&'a self, refresh_token: &'a str) -> RemoteFuture<'a, Credentials> {
        Box::pin(async move {
            self.record(Call::Refresh { refresh_token: refresh_token.to_string() });
            self.pause().await;
            let scripted = self.refresh_results.lock().unwrap().pop_front();
            if let Some(err) = scripted {
                return Err(err);
            }
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            let creds = Credentials {
                access_token: format!("access-{n}"),
                refresh_token: format!("refresh-{n}"),
            };
            self.accept_only(&creds.access_token);
            Ok(creds)
        })
    }

    fn health(&self) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            self.record(Call::Health);
            if self.healthy.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(RemoteError::Transient("connection refused".into()))
            }
        })
    }
}

/// A session over `remote` holding the pair `access-0`/`refresh-0`.
pub fn authed_session(remote: &Arc<MockRemote>, dir: &Path) -> Session<MockRemote> {
    let store = CredentialStore::new(dir.join("credentials.json"));
    store
        .save(&Credentials { access_token: "access-0".into(), refresh_token: "refresh-0".into() })
        .unwrap();
    Session::new(Arc::clone(remote), store).unwrap()
}
