// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for rp-core operations.

use thiserror::Error;

/// All possible errors that can occur in rp-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("outbox entry not found: {0}")]
    EntryNotFound(i64),

    #[error("unknown file category: '{0}'\n  hint: valid categories are: photo, signature, pdf, xlsx")]
    UnknownCategory(String),

    #[error("unknown entry kind: '{0}'")]
    UnknownKind(String),

    #[error("cannot infer file category for '{0}'\n  hint: pass the category explicitly")]
    UninferableCategory(String),

    #[error("local storage is full: {0}")]
    StorageFull(String),

    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        // SQLITE_FULL is the only storage error callers are expected to react to
        match e.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DiskFull) => Error::StorageFull(e.to_string()),
            _ => Error::Database(e),
        }
    }
}

/// A specialized Result type for rp-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
