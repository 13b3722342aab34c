// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod auth;
mod common;
mod help;
mod init;
mod quarantine;
mod queue;
