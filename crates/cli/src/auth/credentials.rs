// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk storage of the access/refresh credential pair.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::remote::Credentials;

/// Persists credentials as JSON in `.reporta/credentials.json`.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CredentialStore { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored pair, `None` if nothing is stored.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let creds = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("invalid credentials file {}: {}", self.path.display(), e))
        })?;
        Ok(Some(creds))
    }

    /// Replace the stored pair.
    ///
    /// Writes to a temporary file with fsync and renames it over the old
    /// one, so a crash never leaves a truncated pair behind.
    pub fn save(&self, creds: &Credentials) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(serde_json::to_string_pretty(creds)?.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Forget the stored pair. Clearing an empty store is a no-op.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
