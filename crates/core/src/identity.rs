// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Default workspace owner and computer name.
//!
//! Workspaces are scoped to an owner and registered from a computer. When
//! the user does not name them explicitly they come from the environment.

use std::process::Command;

/// Returns the default workspace owner.
///
/// Resolution order:
/// 1. `TFSYNC_USER`
/// 2. `USER`, `LOGNAME` or `USERNAME`
/// 3. Fallback to "unknown"
pub fn default_owner() -> String {
    owner_from(|key| std::env::var(key).ok())
}

/// Returns the name of this computer.
///
/// Uses `HOSTNAME` or `COMPUTERNAME`, then the `hostname` command, then
/// "localhost".
pub fn computer_name() -> String {
    if let Some(name) = computer_from(|key| std::env::var(key).ok()) {
        return name;
    }
    hostname_command().unwrap_or_else(|| "localhost".to_string())
}

fn owner_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["TFSYNC_USER", "USER", "LOGNAME", "USERNAME"]
        .iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn computer_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn hostname_command() -> Option<String> {
    let output = Command::new("hostname").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
