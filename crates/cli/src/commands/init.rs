// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use tfsync_core::{identity, PathMapper, WorkspaceInfo};

use crate::config::{init_work_dir, Config, ServerConfig};
use crate::error::Result;
use crate::project::{local_path, Project};

pub fn run(
    name: Option<String>,
    owner: Option<String>,
    server: Option<String>,
    map: Option<String>,
    path: Option<String>,
) -> Result<()> {
    let target = match path {
        Some(p) => local_path(&p)?,
        None => local_path(".")?,
    };

    let info = build_info(
        name,
        owner.unwrap_or_else(identity::default_owner),
        map.as_deref(),
        &target,
    )?;
    let config = Config {
        server: ServerConfig {
            url: server,
            ..Default::default()
        },
        ..Default::default()
    };

    let work_dir = init_work_dir(&target, &config, &info)?;
    println!(
        "Initialized workspace {} at {}",
        info.id(),
        work_dir.display()
    );

    if let Some(server_path) = map {
        println!("Mapped {} -> {}", server_path, target.display());
        if config.is_online() {
            register(work_dir, &server_path, &target)?;
        }
    }

    Ok(())
}

/// Workspace record for a new project rooted at `target`.
pub(crate) fn build_info(
    name: Option<String>,
    owner: String,
    map: Option<&str>,
    target: &Path,
) -> Result<WorkspaceInfo> {
    let name = name.unwrap_or_else(|| derive_name(target));
    let mut info = WorkspaceInfo::new(name, owner);
    info.computer = identity::computer_name();

    if let Some(server_path) = map {
        let mut mapper = PathMapper::new();
        mapper.map(server_path, target)?;
        info.folders = mapper.folders().to_vec();
    }
    Ok(info)
}

/// Workspace name taken from the directory name.
pub(crate) fn derive_name(target: &Path) -> String {
    target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "workspace".to_string())
}

/// Sends the initial mapping to the server.
fn register(work_dir: PathBuf, server_path: &str, target: &Path) -> Result<()> {
    let project = Project::open(work_dir)?;
    let workspace = project.connect()?;
    project.registry().update(|_| {
        workspace.map(server_path, target)?;
        Ok(workspace.info())
    })?;
    println!("Registered workspace {} with the server", workspace.id());
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
