// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tfsync_core::{CheckInResult, WorkItemLink};

use crate::error::{Error, Result};
use crate::project::scope_specs;

use super::{failure_lines, finish, open_workspace};

pub fn run(paths: Vec<String>, message: String, work_items: Vec<i32>, resolve: bool) -> Result<()> {
    if message.trim().is_empty() {
        return Err(Error::InvalidInput(
            "check-in comment is empty\n  hint: pass -m \"<comment>\"".to_string(),
        ));
    }
    let (project, workspace) = open_workspace()?;
    let specs = scope_specs(&project.mapper()?, &paths)?;

    workspace.refresh_pending()?;
    let result = workspace.check_in(&specs, &message, &links(&work_items, resolve))?;

    let (lines, failed) = outcome(&result);
    if result.is_committed() {
        println!("Checked in changeset {}", result.changeset);
    }
    finish(lines, failed)
}

pub(crate) fn links(ids: &[i32], resolve: bool) -> Vec<WorkItemLink> {
    ids.iter().map(|&id| WorkItemLink { id, resolve }).collect()
}

/// Failure lines and the count that makes the command fail.
///
/// A check-in that produced no changeset fails even when the server only
/// sent warnings.
pub(crate) fn outcome(result: &CheckInResult) -> (Vec<String>, usize) {
    let mut lines = failure_lines(&result.failures);
    if result.is_committed() {
        let errors = result.failures.iter().filter(|f| f.is_error()).count();
        return (lines, errors);
    }
    lines.push("error: nothing was checked in; pending changes are kept".to_string());
    (lines, result.failures.len().max(1))
}
