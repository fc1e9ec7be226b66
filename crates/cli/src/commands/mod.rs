// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod changes;
pub mod checkin;
pub mod conflicts;
pub mod get;
pub mod init;
pub mod query;
pub mod resolve_path;
pub mod status;
pub mod workfold;

use serde::Serialize;
use tfsync_core::{Failure, PendReport, ProcessReport, Workspace};

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::project::Project;

/// Helper to open the project and attach its workspace.
pub fn open_workspace() -> Result<(Project, Workspace)> {
    let project = Project::find()?;
    let workspace = project.connect()?;
    Ok((project, workspace))
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints text or JSON depending on `format`.
pub fn emit<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> Vec<String>,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Text => {
            for line in text() {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────────────────

/// One line per local failure; the count of failed items.
pub fn process_lines(report: &ProcessReport) -> (Vec<String>, usize) {
    let mut lines: Vec<String> = report
        .failures
        .iter()
        .map(|f| format!("error: {}", f))
        .collect();
    if report.cancelled {
        lines.push("warning: cancelled before all items were processed".to_string());
    }
    (lines, report.failures.len())
}

/// Server failures followed by local ones; the count of error failures.
pub fn pend_lines(report: &PendReport) -> (Vec<String>, usize) {
    let mut lines = failure_lines(&report.failures);
    let (local, local_failed) = process_lines(&report.process);
    lines.extend(local);
    let failed = report.failures.iter().filter(|f| f.is_error()).count() + local_failed;
    (lines, failed)
}

pub fn failure_lines(failures: &[Failure]) -> Vec<String> {
    failures.iter().map(|f| f.to_string()).collect()
}

/// Prints failure lines to stderr and turns a non-zero count into an error.
pub fn finish(lines: Vec<String>, failed: usize) -> Result<()> {
    for line in lines {
        eprintln!("{}", line);
    }
    if failed > 0 {
        return Err(Error::PartialFailure { failed });
    }
    Ok(())
}

pub fn finish_pend(report: &PendReport) -> Result<()> {
    let (lines, failed) = pend_lines(report);
    finish(lines, failed)
}

pub fn finish_process(report: &ProcessReport) -> Result<()> {
    let (lines, failed) = process_lines(report);
    finish(lines, failed)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
