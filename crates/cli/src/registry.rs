// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted workspace mapping file.
//!
//! `.tfsync/workspace.toml` records the workspace name, owner and its
//! working folders. It is read when a workspace is attached and rewritten
//! whenever the mappings change. Writers hold an exclusive lock on
//! `.tfsync/workspace.lock` for the whole read-modify-write.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tfsync_core::WorkspaceInfo;

use crate::error::{Error, Result};

const REGISTRY_FILE_NAME: &str = "workspace.toml";
const LOCK_FILE_NAME: &str = "workspace.lock";

/// Handle to the workspace mapping file of one `.tfsync/` directory.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
    lock_path: PathBuf,
}

impl Registry {
    pub fn new(work_dir: &Path) -> Self {
        Registry {
            path: work_dir.join(REGISTRY_FILE_NAME),
            lock_path: work_dir.join(LOCK_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the recorded workspace.
    pub fn load(&self) -> Result<WorkspaceInfo> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::Registry(format!("failed to read {}: {}", self.path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Registry(format!("failed to parse {}: {}", self.path.display(), e)))
    }

    /// Replaces the recorded workspace.
    pub fn save(&self, info: &WorkspaceInfo) -> Result<()> {
        let _lock = self.acquire_lock()?;
        self.write(info)
    }

    /// Applies `change` to the recorded workspace under the lock and writes
    /// the result back. Nothing is written when `change` fails.
    pub fn update<F>(&self, change: F) -> Result<WorkspaceInfo>
    where
        F: FnOnce(WorkspaceInfo) -> Result<WorkspaceInfo>,
    {
        let _lock = self.acquire_lock()?;
        let updated = change(self.load()?)?;
        self.write(&updated)?;
        Ok(updated)
    }

    fn write(&self, info: &WorkspaceInfo) -> Result<()> {
        let content = toml::to_string_pretty(info)
            .map_err(|e| Error::Registry(format!("failed to serialize workspace: {}", e)))?;
        fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), folders = info.folders.len(), "saved workspace");
        Ok(())
    }

    /// Acquire an exclusive lock on the lock file.
    fn acquire_lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;

        file.try_lock_exclusive()
            .map_err(|e| Error::Registry(format!("workspace file is locked: {}", e)))?;

        Ok(file)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
