// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use rp_core::Outbox;

use crate::config::{init_work_dir, outbox_path};
use crate::error::Result;

pub fn run(api_url: String, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let work_dir = run_impl(&target_path, &api_url)?;

    println!("Initialized reporta at {}", work_dir.display());
    println!("API: {}", api_url.trim_end_matches('/'));
    println!();
    println!("Next: reporta auth set --access <token> --refresh <token>");
    Ok(())
}

/// Create `.reporta/` under `target` along with an empty outbox.
pub(crate) fn run_impl(target: &Path, api_url: &str) -> Result<PathBuf> {
    if !target.exists() {
        std::fs::create_dir_all(target)?;
    }
    let work_dir = init_work_dir(target, api_url)?;
    Outbox::open(&outbox_path(&work_dir))?;
    Ok(work_dir)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
