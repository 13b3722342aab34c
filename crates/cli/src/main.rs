// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fs;

use clap::Parser;
use reporta::config::log_path;
use reporta::{find_work_dir, Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(dir) = &cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("error: cannot change to directory '{}': {}", dir, e);
            std::process::exit(1);
        }
    }

    setup_logging(&cli.command);

    if let Err(e) = reporta::run(cli.command).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `watch` logs to `.reporta/sync.log`; every other command logs warnings to stderr.
fn setup_logging(command: &Command) {
    let watching = matches!(command, Command::Watch);
    let default_level = if watching { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_file = if watching {
        find_work_dir().ok().and_then(|work_dir| {
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path(&work_dir))
                .ok()
        })
    } else {
        None
    };

    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
