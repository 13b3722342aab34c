// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.reporta/config.toml` and includes:
//! - `api_url`: Base URL of the service API (overridable with `REPORTA_API_URL`)
//! - `[sync]`: Drain loop and trigger tuning
//!
//! The same directory holds the outbox database, the stored credentials,
//! the sync lock and the sync log.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".reporta";
const CONFIG_FILE_NAME: &str = "config.toml";
const OUTBOX_FILE_NAME: &str = "outbox.db";
const CREDENTIALS_FILE_NAME: &str = "credentials.json";
const LOCK_FILE_NAME: &str = "sync.lock";
const LOG_FILE_NAME: &str = "sync.log";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Project configuration stored in `.reporta/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the service API, without a trailing slash.
    pub api_url: String,
    /// Sync tuning (optional - defaults apply when absent).
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Drain loop and trigger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Periodic drain interval in seconds while online (default: 15).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Timeout applied to every remote call in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Sibling uploads of one composite entry allowed in flight (default: 1).
    #[serde(default = "default_upload_concurrency")]
    pub upload_concurrency: usize,
    /// Permanent failures before an entry is quarantined. 0 = never (default).
    #[serde(default)]
    pub quarantine_after: u32,
    /// Reachability probe interval in seconds for `reporta watch` (default: 5).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    15
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_upload_concurrency() -> usize {
    1
}

fn default_probe_interval_secs() -> u64 {
    5
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            upload_concurrency: default_upload_concurrency(),
            quarantine_after: 0,
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

impl SyncSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }
}

/// Validates and normalizes an API base URL.
///
/// # Errors
///
/// Returns [`Error::InvalidApiUrl`] unless the url is http(s) with a host.
pub fn normalize_api_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| Error::InvalidApiUrl(url.to_string()))?;
    if host.is_empty() || host.starts_with('/') {
        return Err(Error::InvalidApiUrl(url.to_string()));
    }
    Ok(trimmed.to_string())
}

impl Config {
    /// Creates a new config for the given API url.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidApiUrl`] if the url is not http(s).
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Config { api_url: normalize_api_url(api_url)?, sync: SyncSettings::default() })
    }

    /// Loads configuration from the given `.reporta/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration to the given `.reporta/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// The API url in effect, honoring `REPORTA_API_URL`.
    pub fn effective_api_url(&self) -> Result<String> {
        self.api_url_or(env::api_url())
    }

    /// The API url in effect given an optional override.
    pub fn api_url_or(&self, override_url: Option<String>) -> Result<String> {
        match override_url {
            Some(url) => normalize_api_url(&url),
            None => Ok(self.api_url.clone()),
        }
    }
}

/// Find the .reporta directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .reporta directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.join(CONFIG_FILE_NAME).is_file() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Path of the outbox database.
pub fn outbox_path(work_dir: &Path) -> PathBuf {
    work_dir.join(OUTBOX_FILE_NAME)
}

/// Path of the stored credential pair.
pub fn credentials_path(work_dir: &Path) -> PathBuf {
    work_dir.join(CREDENTIALS_FILE_NAME)
}

/// Path of the lock guarding one sync process per directory.
pub fn lock_path(work_dir: &Path) -> PathBuf {
    work_dir.join(LOCK_FILE_NAME)
}

/// Path of the background sync log.
pub fn log_path(work_dir: &Path) -> PathBuf {
    work_dir.join(LOG_FILE_NAME)
}

/// Initialize a new .reporta directory at the given path
///
/// An existing `.reporta/` without a config file is reused.
pub fn init_work_dir(path: &Path, api_url: &str) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let config = Config::new(api_url)?;
    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// Credentials and queued data are never meant to be committed.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = "# Credentials\ncredentials.json\n\n# Queued writes and runtime state\noutbox.db*\nsync.lock\nsync.log\n";
    fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
