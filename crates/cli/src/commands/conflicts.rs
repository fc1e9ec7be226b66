// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Conflict listing and resolution.
//!
//! The active conflict set lives only as long as the attached workspace,
//! so `resolve` queries every mapped folder before settling one conflict.

use tfsync_core::{Conflict, ConflictType, Resolution, ResolveReport};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::project::{cancel_on_ctrl_c, scope_specs};

use super::{emit, finish, open_workspace, process_lines};

pub fn list(paths: Vec<String>, format: OutputFormat) -> Result<()> {
    let (project, workspace) = open_workspace()?;
    let found = workspace.conflicts(&scope_specs(&project.mapper()?, &paths)?)?;
    emit(format, &found, || lines(&found))
}

pub fn resolve(conflict_id: i32, resolution: String) -> Result<()> {
    let resolution: Resolution = resolution.parse()?;
    let (project, workspace) = open_workspace()?;
    workspace.conflicts(&scope_specs(&project.mapper()?, &[])?)?;

    let report = workspace.resolve(conflict_id, resolution, &cancel_on_ctrl_c())?;
    println!("{}", summary(&report));
    let (mut lines, mut failed) = process_lines(&report.get);
    let (undo_lines, undo_failed) = process_lines(&report.undo);
    lines.extend(undo_lines);
    failed += undo_failed;
    finish(lines, failed)
}

fn type_name(kind: ConflictType) -> &'static str {
    match kind {
        ConflictType::Get => "get",
        ConflictType::CheckIn => "checkin",
        ConflictType::Local => "local",
        ConflictType::Merge => "merge",
    }
}

fn resolution_name(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::AcceptYours => "yours",
        Resolution::AcceptTheirs => "theirs",
        Resolution::Merge => "merge",
    }
}

pub(crate) fn lines(conflicts: &[Conflict]) -> Vec<String> {
    if conflicts.is_empty() {
        return vec!["There are no conflicts".to_string()];
    }
    conflicts
        .iter()
        .map(|c| {
            let mut line = format!(
                "{:>6}  {:<8} {} (yours {}, theirs {}, base {})",
                c.conflict_id,
                type_name(c.conflict_type),
                c.your_server_path,
                c.your_version,
                c.their_version,
                c.base_version
            );
            if c.their_server_path != c.your_server_path {
                line.push_str(&format!(" <- {}", c.their_server_path));
            }
            line
        })
        .collect()
}

pub(crate) fn summary(report: &ResolveReport) -> String {
    format!(
        "Resolved conflict {} with {} ({} get, {} undo operation(s) applied)",
        report.conflict_id,
        resolution_name(report.resolution),
        report.get.applied,
        report.undo.applied
    )
}

#[cfg(test)]
#[path = "conflicts_tests.rs"]
mod tests;
