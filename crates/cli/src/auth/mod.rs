// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Credential storage and the refreshing session.

mod credentials;
mod session;

pub use credentials::CredentialStore;
pub use session::Session;
