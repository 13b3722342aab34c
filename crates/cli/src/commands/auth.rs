// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::auth::CredentialStore;
use crate::config::{credentials_path, find_work_dir};
use crate::error::{Error, Result};
use crate::remote::Credentials;

pub fn set(access: String, refresh: String) -> Result<()> {
    let work_dir = find_work_dir()?;
    set_impl(&work_dir, access, refresh)?;
    println!("Stored credentials in {}", credentials_path(&work_dir).display());
    Ok(())
}

pub fn clear() -> Result<()> {
    let work_dir = find_work_dir()?;
    CredentialStore::new(credentials_path(&work_dir)).clear()?;
    println!("Cleared stored credentials");
    Ok(())
}

pub fn status() -> Result<()> {
    let work_dir = find_work_dir()?;
    if is_authenticated(&work_dir)? {
        println!("authenticated");
        Ok(())
    } else {
        Err(Error::NotAuthenticated)
    }
}

pub(crate) fn set_impl(work_dir: &Path, access: String, refresh: String) -> Result<()> {
    let access_token = access.trim().to_string();
    let refresh_token = refresh.trim().to_string();
    if access_token.is_empty() {
        return Err(Error::FieldRequired { field: "access token" });
    }
    if refresh_token.is_empty() {
        return Err(Error::FieldRequired { field: "refresh token" });
    }
    CredentialStore::new(credentials_path(work_dir)).save(&Credentials {
        access_token,
        refresh_token,
    })
}

pub(crate) fn is_authenticated(work_dir: &Path) -> Result<bool> {
    Ok(CredentialStore::new(credentials_path(work_dir)).load()?.is_some())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
