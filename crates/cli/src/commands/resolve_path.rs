// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tfsync_core::{path, PathMapper};

use crate::error::{Error, Result};
use crate::project::{server_path, Project};

pub fn run(arg: String) -> Result<()> {
    let project = Project::find()?;
    println!("{}", resolve(&project.mapper()?, &arg)?);
    Ok(())
}

/// Server paths resolve to local paths and local paths to server paths.
pub(crate) fn resolve(mapper: &PathMapper, arg: &str) -> Result<String> {
    if !path::is_server_path(arg) {
        return server_path(mapper, arg);
    }
    let server = path::normalize_server(arg)?;
    mapper
        .local_path_for(&server)
        .map(|local| local.display().to_string())
        .ok_or_else(|| Error::Engine(tfsync_core::Error::NotMapped(server)))
}
