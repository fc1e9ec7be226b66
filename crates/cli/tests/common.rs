// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The binary with a fixed owner and no ambient log settings.
pub fn tfs() -> Command {
    let mut cmd = cargo_bin_cmd!("tfs");
    cmd.env("TFSYNC_USER", "alice").env_remove("RUST_LOG");
    cmd
}

/// Temp directory path as the child process sees it.
pub fn root(temp: &TempDir) -> PathBuf {
    temp.path().canonicalize().unwrap()
}

/// Helper to create an offline workspace named `dev`
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    tfs()
        .args(["init", "--name", "dev"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an offline workspace with the root mapped to `$/P`
pub fn init_mapped() -> TempDir {
    let temp = TempDir::new().unwrap();
    tfs()
        .args(["init", "--name", "dev", "--map", "$/P"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Reads `.tfsync/workspace.toml`.
pub fn registry(temp: &TempDir) -> String {
    std::fs::read_to_string(temp.path().join(".tfsync/workspace.toml")).unwrap()
}
