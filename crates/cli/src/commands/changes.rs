// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending change commands: add, edit, delete, rename, lock and undo.

use tfsync_core::{ItemSpec, LockLevel, PendReport, RecursionType};

use crate::error::Result;
use crate::project::{cancel_on_ctrl_c, local_path, local_paths, server_path};

use super::{finish_pend, open_workspace};

pub fn add(paths: Vec<String>, recursive: bool) -> Result<()> {
    let (_project, workspace) = open_workspace()?;
    let report = workspace.pend_add(&local_paths(&paths)?, recursive, &cancel_on_ctrl_c())?;
    report_pend("add", paths.len(), &report)
}

pub fn edit(paths: Vec<String>) -> Result<()> {
    let (_project, workspace) = open_workspace()?;
    let report = workspace.pend_edit(&local_paths(&paths)?, &cancel_on_ctrl_c())?;
    report_pend("edit", paths.len(), &report)
}

pub fn delete(paths: Vec<String>) -> Result<()> {
    let (_project, workspace) = open_workspace()?;
    let report = workspace.pend_delete(&local_paths(&paths)?, &cancel_on_ctrl_c())?;
    report_pend("delete", paths.len(), &report)
}

pub fn rename(from: String, to: String) -> Result<()> {
    let (_project, workspace) = open_workspace()?;
    let report = workspace.pend_rename(
        &local_path(&from)?,
        &local_path(&to)?,
        &cancel_on_ctrl_c(),
    )?;
    report_pend("rename", 1, &report)
}

pub fn lock(paths: Vec<String>, level: String) -> Result<()> {
    let level: LockLevel = level.parse()?;
    let (_project, workspace) = open_workspace()?;
    let report = workspace.lock(&local_paths(&paths)?, level, &cancel_on_ctrl_c())?;
    report_pend("lock", paths.len(), &report)
}

pub fn undo(paths: Vec<String>, recursive: bool) -> Result<()> {
    let (project, workspace) = open_workspace()?;
    let mapper = project.mapper()?;
    let recursion = if recursive {
        RecursionType::Full
    } else {
        RecursionType::None
    };
    let specs = paths
        .iter()
        .map(|p| Ok(ItemSpec::new(server_path(&mapper, p)?, recursion)))
        .collect::<Result<Vec<_>>>()?;

    workspace.refresh_pending()?;
    let report = workspace.undo(&specs, &cancel_on_ctrl_c())?;
    report_pend("undo", paths.len(), &report)
}

fn report_pend(verb: &str, requested: usize, report: &PendReport) -> Result<()> {
    println!("{}", summary(verb, requested, report));
    finish_pend(report)
}

pub(crate) fn summary(verb: &str, requested: usize, report: &PendReport) -> String {
    let mut line = format!(
        "{}: {} path(s), {} local operation(s) applied",
        verb, requested, report.process.applied
    );
    if report.process.flushed > 0 {
        line.push_str(&format!(", {} version(s) recorded", report.process.flushed));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfsync_core::ProcessReport;

    #[test]
    fn summary_counts_operations() {
        let report = PendReport {
            failures: Vec::new(),
            process: ProcessReport {
                applied: 2,
                ..ProcessReport::default()
            },
        };
        assert_eq!(
            summary("edit", 2, &report),
            "edit: 2 path(s), 2 local operation(s) applied"
        );
    }

    #[test]
    fn summary_mentions_recorded_versions() {
        let report = PendReport {
            failures: Vec::new(),
            process: ProcessReport {
                applied: 1,
                flushed: 1,
                ..ProcessReport::default()
            },
        };
        assert!(summary("delete", 1, &report).ends_with(", 1 version(s) recorded"));
    }
}
