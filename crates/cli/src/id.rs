// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

static NONCE: AtomicU64 = AtomicU64::new(0);

/// Generate a service uid from a seed, a timestamp and a nonce.
/// Format: UUID-shaped groups (8-4-4-4-12) of SHA256(seed + timestamp + nonce)
pub fn generate_service_uid(seed: &str, created_at: &DateTime<Utc>, nonce: u64) -> String {
    let input = format!("{}{}{}", seed, created_at.to_rfc3339(), nonce);
    let hash = Sha256::digest(input.as_bytes());
    let hex = hex::encode(&hash[..16]);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Generate a fresh service uid for a new visit.
///
/// The process id and a per-process counter keep uids distinct when two
/// visits with the same seed are recorded within the same instant.
pub fn new_service_uid(seed: &str) -> String {
    let nonce = (u64::from(std::process::id()) << 32) | NONCE.fetch_add(1, Ordering::Relaxed);
    generate_service_uid(seed, &Utc::now(), nonce)
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
