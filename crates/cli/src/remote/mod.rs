// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote operation client for the service API.
//!
//! Provides a trait-based client layer that enables:
//! - Real HTTP calls for production ([`HttpRemote`])
//! - Mock remotes for unit testing
//!
//! Every operation reports failures through [`RemoteError`], whose
//! classification drives the drain loop: transient failures leave the entry
//! queued for the next trigger, permanent ones may count towards quarantine.

mod http;

pub use http::{classify_status, HttpRemote};

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use rp_core::{Attachment, ReportDispatch, ServiceCreateRequest};

/// Error type for remote operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The access token was rejected (HTTP 401).
    #[error("access token expired")]
    AuthExpired,

    /// Credentials cannot be renewed without re-authenticating.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The refresh token itself was rejected.
    #[error("invalid refresh token: {0}")]
    InvalidRefreshToken(String),

    /// The request was rejected by the server (4xx other than 401).
    #[error("rejected by server ({status}): {message}")]
    Validation { status: u16, message: String },

    /// Network unreachable, timeout or server error; retrying may succeed.
    #[error("transient failure: {0}")]
    Transient(String),

    /// The response could not be understood.
    #[error("fatal failure: {0}")]
    Fatal(String),
}

impl RemoteError {
    /// True if an identical retry may succeed without any intervention.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Transient(_))
    }

    /// True if an identical retry will fail the same way.
    ///
    /// Authentication failures are excluded: they clear up once the user
    /// re-authenticates.
    pub fn is_permanent(&self) -> bool {
        matches!(self, RemoteError::Validation { .. } | RemoteError::Fatal(_))
    }
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`Remote`] operations.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// A service record as echoed back by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    /// Server-assigned record identifier.
    pub id: String,
}

/// A stored file as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// An access/refresh credential pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Remote trait for the service API.
///
/// This trait abstracts over the actual network client, allowing for easy
/// testing with mock implementations. Authenticated operations receive the
/// bearer token to use; renewing it is the caller's concern.
pub trait Remote: Send + Sync {
    /// Create a service record.
    fn create_record<'a>(
        &'a self,
        token: &'a str,
        request: &'a ServiceCreateRequest,
    ) -> RemoteFuture<'a, RecordRef>;

    /// Upload one file to an existing record.
    fn upload_file<'a>(
        &'a self,
        token: &'a str,
        record_id: &'a str,
        attachment: &'a Attachment,
    ) -> RemoteFuture<'a, FileRef>;

    /// Sign a record and email its report.
    fn send_report<'a>(
        &'a self,
        token: &'a str,
        record_id: &'a str,
        dispatch: &'a ReportDispatch,
    ) -> RemoteFuture<'a, ()>;

    /// Exchange a refresh token for a new credential pair.
    ///
    /// Fails with [`RemoteError::InvalidRefreshToken`] when the refresh
    /// token is no longer accepted.
    fn refresh_credentials<'a>(&'a self, refresh_token: &'a str) -> RemoteFuture<'a, Credentials>;

    /// Check that the API is reachable.
    fn health(&self) -> RemoteFuture<'_, ()>;
}

#[cfg(test)]
pub(crate) mod mock;
