// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities for help and command output.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use crate::env;

/// ANSI 256-color codes
pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders and hints: medium grey
    pub const CONTEXT: u8 = 245;
    /// Writes accepted by the server: soft green
    pub const DELIVERED: u8 = 114;
    /// Writes waiting in the outbox: amber
    pub const QUEUED: u8 = 179;
    /// Held or failed writes: soft red
    pub const HELD: u8 = 174;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn paint(code: u8, text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }
    format!("\x1b[38;5;{code}m{text}\x1b[0m")
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

pub fn delivered(text: &str) -> String {
    paint(codes::DELIVERED, text)
}

pub fn queued(text: &str) -> String {
    paint(codes::QUEUED, text)
}

pub fn held(text: &str) -> String {
    paint(codes::HELD, text)
}

/// Colorize an examples help block.
///
/// Lines ending with `:` are headers. In example lines (`command  description`)
/// the command is a literal and `<placeholders>` are context.
pub fn examples(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }

    let mut lines = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if trimmed.ends_with(':') && !trimmed.contains("  ") {
            lines.push(format!("{indent}{}", header(trimmed)));
            continue;
        }

        match find_description_start(trimmed) {
            Some(end) => {
                let (cmd, desc) = trimmed.split_at(end);
                lines.push(format!("{indent}{}{desc}", colorize_command(cmd)));
            }
            None => lines.push(line.to_string()),
        }
    }
    lines.join("\n")
}

/// Colorize a command: words are literals, `<placeholders>` are context.
pub fn colorize_command(cmd: &str) -> String {
    cmd.split(' ')
        .map(|word| {
            if word.starts_with('<') && word.ends_with('>') {
                context(word)
            } else if word.is_empty() {
                String::new()
            } else {
                literal(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find where the description starts (the first run of 2+ spaces).
pub fn find_description_start(line: &str) -> Option<usize> {
    line.find("  ").filter(|&i| i > 0)
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
