// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::remote::RemoteError;

/// All possible errors that can occur in the reporta library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'reporta init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("not authenticated\n  hint: run 'reporta auth set --access <token> --refresh <token>'")]
    NotAuthenticated,

    #[error("invalid API url: '{0}'\n  hint: the url must start with http:// or https://")]
    InvalidApiUrl(String),

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("a sync is already running in this directory")]
    SyncInProgress,

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Core(#[from] rp_core::Error),

    #[error("outbox storage error: {0}")]
    Storage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for reporta operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
