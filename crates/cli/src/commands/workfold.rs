// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Working folder mappings.
//!
//! Without a server the registry is edited directly. With one, each change
//! goes through the workspace so the server sees it before the registry is
//! rewritten.

use std::path::PathBuf;

use tfsync_core::{path, PathMapper, WorkingFolder, WorkspaceInfo};

use crate::cli::{OutputFormat, WorkfoldCommand};
use crate::error::Result;
use crate::project::{local_path, Project};

use super::emit;

/// A requested mapping change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Map { server_path: String, local: PathBuf },
    Unmap { target: String },
    Cloak { server_path: String },
}

pub fn run(command: WorkfoldCommand) -> Result<()> {
    let project = Project::find()?;
    let change = match command {
        WorkfoldCommand::List { output } => return list(&project, output.output),
        WorkfoldCommand::Map {
            server_path,
            local_path: local,
        } => Change::Map {
            server_path,
            local: local_path(local.as_deref().unwrap_or("."))?,
        },
        WorkfoldCommand::Unmap { target } => Change::Unmap {
            target: unmap_target(&target)?,
        },
        WorkfoldCommand::Cloak { server_path } => Change::Cloak { server_path },
    };

    let removed = if project.config().is_online() {
        apply_online(&project, &change)?
    } else {
        apply_offline(&project, &change)?
    };
    println!("{}", describe(&change, removed.as_ref()));
    Ok(())
}

/// Server paths pass through; local paths are made absolute.
fn unmap_target(target: &str) -> Result<String> {
    if path::is_server_path(target) {
        return Ok(target.to_string());
    }
    Ok(local_path(target)?.to_string_lossy().into_owned())
}

/// Applies `change` to a mapper. Returns the removed entry for unmaps.
pub(crate) fn apply(mapper: &mut PathMapper, change: &Change) -> Result<Option<WorkingFolder>> {
    match change {
        Change::Map { server_path, local } => mapper.map(server_path, local)?,
        Change::Unmap { target } => return Ok(Some(mapper.unmap(target)?)),
        Change::Cloak { server_path } => mapper.cloak(server_path)?,
    }
    Ok(None)
}

/// Applies `change` to recorded workspace information.
pub(crate) fn apply_to_info(
    mut info: WorkspaceInfo,
    change: &Change,
) -> Result<(WorkspaceInfo, Option<WorkingFolder>)> {
    let mut mapper = PathMapper::from_folders(&info.folders)?;
    let removed = apply(&mut mapper, change)?;
    info.folders = mapper.folders().to_vec();
    Ok((info, removed))
}

fn apply_offline(project: &Project, change: &Change) -> Result<Option<WorkingFolder>> {
    let mut removed = None;
    project.registry().update(|info| {
        let (updated, folder) = apply_to_info(info, change)?;
        removed = folder;
        Ok(updated)
    })?;
    Ok(removed)
}

fn apply_online(project: &Project, change: &Change) -> Result<Option<WorkingFolder>> {
    let workspace = project.connect()?;
    let mut removed = None;
    project.registry().update(|_| {
        removed = match change {
            Change::Map { server_path, local } => {
                workspace.map(server_path, local)?;
                None
            }
            Change::Unmap { target } => Some(workspace.unmap(target)?),
            Change::Cloak { server_path } => {
                workspace.cloak(server_path)?;
                None
            }
        };
        Ok(workspace.info())
    })?;
    Ok(removed)
}

pub(crate) fn describe(change: &Change, removed: Option<&WorkingFolder>) -> String {
    match (change, removed) {
        (Change::Map { server_path, local }, _) => {
            format!("Mapped {} -> {}", server_path, local.display())
        }
        (Change::Unmap { .. }, Some(folder)) => format!("Unmapped {}", folder_line(folder)),
        (Change::Unmap { target }, None) => format!("Unmapped {}", target),
        (Change::Cloak { server_path }, _) => format!("Cloaked {}", server_path),
    }
}

pub(crate) fn folder_line(folder: &WorkingFolder) -> String {
    match &folder.local_path {
        Some(local) if !folder.is_cloaked() => {
            format!("{} -> {}", folder.server_path, local.display())
        }
        _ => format!("{} (cloaked)", folder.server_path),
    }
}

fn list(project: &Project, format: OutputFormat) -> Result<()> {
    let info = project.info()?;
    emit(format, &info.folders, || {
        if info.folders.is_empty() {
            return vec!["No working folders".to_string()];
        }
        let mut lines = vec![format!("Workspace: {}", info.id())];
        lines.extend(info.folders.iter().map(|f| format!("  {}", folder_line(f))));
        lines
    })
}

#[cfg(test)]
#[path = "workfold_tests.rs"]
mod tests;
