// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for help output completeness.

use super::*;
use clap::CommandFactory;

/// Verifies all subcommands appear in the grouped help text, so new
/// commands don't get forgotten there.
#[test]
fn all_subcommands_in_help() {
    let cmd = Cli::command();

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        assert!(
            COMMANDS_HELP
                .lines()
                .any(|line| line.trim_start().starts_with(&format!("{name} "))),
            "Command '{name}' should be listed in the help output"
        );
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
