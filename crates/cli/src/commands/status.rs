// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tfsync_core::{path, ItemSpec, PendingChange};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::project::scope_specs;

use super::{emit, open_workspace};

pub fn run(paths: Vec<String>, format: OutputFormat) -> Result<()> {
    let (project, workspace) = open_workspace()?;
    let specs = scope_specs(&project.mapper()?, &paths)?;

    workspace.refresh_pending()?;
    let changes = in_scope(&specs, |spec| workspace.pending_changes(spec));

    emit(format, &changes, || lines(&changes))
}

/// Changes from every spec, each server path once, in first-seen order.
pub(crate) fn in_scope(
    specs: &[ItemSpec],
    lookup: impl Fn(&ItemSpec) -> Vec<PendingChange>,
) -> Vec<PendingChange> {
    let mut changes: Vec<PendingChange> = Vec::new();
    for change in specs.iter().flat_map(lookup) {
        if !changes
            .iter()
            .any(|c| path::server_eq(&c.server_path, &change.server_path))
        {
            changes.push(change);
        }
    }
    changes
}

pub(crate) fn lines(changes: &[PendingChange]) -> Vec<String> {
    if changes.is_empty() {
        return vec!["There are no pending changes".to_string()];
    }
    let mut lines: Vec<String> = changes.iter().map(line).collect();
    lines.push(String::new());
    lines.push(format!("{} change(s)", changes.len()));
    lines
}

fn line(change: &PendingChange) -> String {
    let mut text = format!("{:<16} {}", change.change_type.to_string(), change.server_path);
    if let Some(source) = &change.source_server_path {
        text.push_str(&format!(" (from {})", source));
    }
    if let Some(local) = &change.local_path {
        text.push_str(&format!("  {}", local.display()));
    }
    text
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
