// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Clap styles matching the colors used in the rest of the output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let fg = |code: u8| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    let header = fg(colors::codes::HEADER);

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(fg(colors::codes::LITERAL))
        .placeholder(fg(colors::codes::CONTEXT))
        .valid(fg(colors::codes::CONTEXT))
}

/// Main help template: commands are listed before options.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    format!(
        "\
{header_visits}
  {new}         Record a service visit
  {upload}      Upload a file to a service record
  {send}        Sign a record and email its report

{header_outbox}
  {pending}     List writes waiting for delivery
  {sync}        Deliver queued writes now
  {watch}       Keep delivering in the background
  {quarantine}  Inspect or restore held entries

{header_setup}
  {init}        Initialize a reporta directory
  {auth}        Manage stored credentials
  {completion}  Generate shell completions",
        header_visits = colors::header("Service Visits:"),
        header_outbox = colors::header("Outbox:"),
        header_setup = colors::header("Setup:"),
        new = colors::literal("new"),
        upload = colors::literal("upload"),
        send = colors::literal("send"),
        pending = colors::literal("pending"),
        sync = colors::literal("sync"),
        watch = colors::literal("watch"),
        quarantine = colors::literal("quarantine"),
        init = colors::literal("init"),
        auth = colors::literal("auth"),
        completion = colors::literal("completion"),
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  reporta init --api-url <url>                 Point at the service API
  reporta auth set --access <t> --refresh <t>  Store credentials
  reporta new --client Acme --photo p1.jpg     Record a visit
  reporta pending                              See what is still queued
  reporta watch                                Deliver whenever online",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
