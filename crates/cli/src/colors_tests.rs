// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    simple = { "reporta sync  Drain now", Some(12) },
    with_args = { "reporta send <id> -e a@b.c  Send report", Some(26) },
    no_description = { "reporta sync", None },
    leading_spaces = { "  indented", None },
)]
fn description_start(line: &str, expected: Option<usize>) {
    assert_eq!(find_description_start(line), expected);
}

// Colors depend on process-wide state, so the environment is set once
// for every colorized assertion in a single test.
#[test]
fn colorized_output() {
    std::env::remove_var("NO_COLOR");
    std::env::set_var("COLOR", "1");
    assert!(crate::env::force_color());
    assert!(!crate::env::no_color());
    assert!(should_colorize());

    assert_eq!(header("Setup:"), "\x1b[38;5;74mSetup:\x1b[0m");
    assert_eq!(queued("queued"), "\x1b[38;5;179mqueued\x1b[0m");

    let cmd = colorize_command("reporta upload <id>");
    assert!(cmd.contains("\x1b[38;5;250mreporta\x1b[0m"));
    assert!(cmd.contains("\x1b[38;5;245m<id>\x1b[0m"));

    let block = examples("Examples:\n  reporta sync    Drain the outbox now");
    assert!(block.starts_with("\x1b[38;5;74mExamples:"));
    assert!(block.ends_with("    Drain the outbox now"));

    std::env::set_var("NO_COLOR", "1");
    assert!(crate::env::no_color());
    assert!(!should_colorize());
    assert_eq!(delivered("svc_1"), "svc_1");
    assert_eq!(examples("Examples:\n  a  b"), "Examples:\n  a  b");

    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}
