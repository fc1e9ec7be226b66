// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Working folder mappings and path resolution.
//!
//! A workspace owns an ordered list of working folders. Each one maps a
//! server subtree to a local directory, or cloaks a server subtree so it is
//! never brought down. Resolution in either direction picks the mapping
//! with the longest matching prefix.
//!
//! Mapping rules enforced by [`PathMapper::map`]:
//!
//! - A server path may appear only once; re-mapping it replaces the entry.
//! - Two mappings may not share a local folder.
//! - If one local folder nests inside another, the server folders must nest
//!   the same way. Anything else is a partial overlap and is rejected.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path;

/// Identifies a workspace on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId {
    pub name: String,
    pub owner: String,
}

impl WorkspaceId {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        WorkspaceId {
            name: name.into(),
            owner: owner.into(),
        }
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.name, self.owner)
    }
}

/// Kind of working folder entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingFolderType {
    #[default]
    Map,
    Cloak,
}

/// A server path to local path correspondence governing a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingFolder {
    pub server_path: String,
    /// Absent for cloaks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    #[serde(default)]
    pub kind: WorkingFolderType,
}

impl WorkingFolder {
    /// Creates a validated mapping entry.
    pub fn map(server_path: &str, local_path: impl AsRef<Path>) -> Result<Self> {
        Ok(WorkingFolder {
            server_path: path::normalize_server(server_path)?,
            local_path: Some(path::normalize_local(local_path.as_ref())),
            kind: WorkingFolderType::Map,
        })
    }

    /// Creates a validated cloak entry.
    pub fn cloak(server_path: &str) -> Result<Self> {
        Ok(WorkingFolder {
            server_path: path::normalize_server(server_path)?,
            local_path: None,
            kind: WorkingFolderType::Cloak,
        })
    }

    pub fn is_cloaked(&self) -> bool {
        self.kind == WorkingFolderType::Cloak
    }
}

/// Everything persisted about a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub computer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub folders: Vec<WorkingFolder>,
}

impl WorkspaceInfo {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        WorkspaceInfo {
            name: name.into(),
            owner: owner.into(),
            computer: String::new(),
            comment: None,
            folders: Vec::new(),
        }
    }

    pub fn id(&self) -> WorkspaceId {
        WorkspaceId::new(self.name.clone(), self.owner.clone())
    }
}

/// Bidirectional local/server path resolution over a set of working folders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMapper {
    folders: Vec<WorkingFolder>,
}

impl PathMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapper from persisted folders.
    ///
    /// Mappings are validated in order, then cloaks. A cloak that no mapping
    /// covers is skipped with a warning.
    pub fn from_folders(folders: &[WorkingFolder]) -> Result<Self> {
        let mut mapper = PathMapper::new();
        for folder in folders.iter().filter(|f| !f.is_cloaked()) {
            let local = folder.local_path.as_deref().ok_or_else(|| {
                Error::Configuration(format!(
                    "mapping for {} has no local path",
                    folder.server_path
                ))
            })?;
            mapper.map(&folder.server_path, local)?;
        }
        for folder in folders.iter().filter(|f| f.is_cloaked()) {
            if !mapper.covers_cloak(&path::canonical_server(&folder.server_path)) {
                tracing::warn!(
                    server = %folder.server_path,
                    "ignoring cloak that is not beneath a mapped folder"
                );
                continue;
            }
            mapper.cloak(&folder.server_path)?;
        }
        Ok(mapper)
    }

    /// The working folders in insertion order.
    pub fn folders(&self) -> &[WorkingFolder] {
        &self.folders
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Maps a server folder to a local folder.
    ///
    /// An existing entry for the same server path is replaced. Overlapping
    /// mappings fail with [`Error::Configuration`] and leave the mapper
    /// unchanged.
    pub fn map(&mut self, server_path: &str, local_path: impl AsRef<Path>) -> Result<()> {
        let folder = WorkingFolder::map(server_path, local_path)?;
        let local = folder
            .local_path
            .as_deref()
            .ok_or_else(|| Error::Configuration("mapping has no local path".to_string()))?;
        if local.as_os_str().is_empty() {
            return Err(Error::Configuration(format!(
                "empty local path for {}",
                folder.server_path
            )));
        }

        for existing in self.mappings() {
            if path::server_eq(&existing.server_path, &folder.server_path) {
                continue;
            }
            let Some(existing_local) = existing.local_path.as_deref() else {
                continue;
            };
            check_overlap(existing, existing_local, &folder.server_path, local)?;
        }

        tracing::debug!(
            server = %folder.server_path,
            local = %local.display(),
            "mapping working folder"
        );
        self.replace_or_push(folder);
        Ok(())
    }

    /// Cloaks a server folder beneath an existing mapping.
    pub fn cloak(&mut self, server_path: &str) -> Result<()> {
        let folder = WorkingFolder::cloak(server_path)?;
        if !self.covers_cloak(&folder.server_path) {
            return Err(Error::Configuration(format!(
                "cannot cloak {}: it is not beneath a mapped folder",
                folder.server_path
            )));
        }
        self.replace_or_push(folder);
        Ok(())
    }

    fn covers_cloak(&self, server_path: &str) -> bool {
        self.mappings().any(|m| {
            !path::server_eq(&m.server_path, server_path)
                && path::is_server_sub_item(server_path, &m.server_path)
        })
    }

    fn drop_orphaned_cloaks(&mut self) {
        let orphaned: Vec<String> = self
            .folders
            .iter()
            .filter(|f| f.is_cloaked() && !self.covers_cloak(&f.server_path))
            .map(|f| f.server_path.clone())
            .collect();
        for server_path in &orphaned {
            tracing::debug!(server = %server_path, "dropping cloak with no covering mapping");
        }
        self.folders
            .retain(|f| !(f.is_cloaked() && orphaned.contains(&f.server_path)));
    }

    /// Removes the entry for a server or local path.
    ///
    /// Cloaks that no remaining mapping covers are removed with it.
    pub fn unmap(&mut self, target: &str) -> Result<WorkingFolder> {
        let position = if path::is_server_path(target) {
            let server = path::normalize_server(target)?;
            self.folders
                .iter()
                .position(|f| path::server_eq(&f.server_path, &server))
        } else {
            let local = Path::new(target);
            self.folders.iter().position(|f| {
                f.local_path
                    .as_deref()
                    .is_some_and(|l| path::local_eq(l, local))
            })
        };
        let Some(index) = position else {
            return Err(Error::Configuration(format!(
                "no working folder mapping for {target}"
            )));
        };
        let removed = self.folders.remove(index);
        self.drop_orphaned_cloaks();
        Ok(removed)
    }

    /// Resolves a local path to its server path, or `None` if not mapped.
    ///
    /// The result must be governed by the same mapping on the server side;
    /// a local path that would resolve back to a different local folder, or
    /// into a cloak, is not mapped.
    pub fn server_path_for(&self, local_path: &Path) -> Option<String> {
        let (mapping, relative) = self
            .mappings()
            .filter_map(|m| {
                let base = m.local_path.as_deref()?;
                path::local_relative(base, local_path).map(|rel| (m, rel))
            })
            .max_by_key(|(m, _)| {
                m.local_path
                    .as_deref()
                    .map(|l| path::normalize_local(l).components().count())
                    .unwrap_or(0)
            })?;

        let server = path::server_join(&mapping.server_path, &relative.join("/"));
        let governing = self.governing_folder(&server)?;
        if governing.is_cloaked() || !path::server_eq(&governing.server_path, &mapping.server_path)
        {
            return None;
        }
        Some(server)
    }

    /// Resolves a server path to its local path, or `None` if not mapped or
    /// cloaked.
    pub fn local_path_for(&self, server_path: &str) -> Option<PathBuf> {
        let server = path::normalize_server(server_path).ok()?;
        let governing = self.governing_folder(&server)?;
        if governing.is_cloaked() {
            return None;
        }
        let base = governing.local_path.as_deref()?;
        let relative = path::server_relative(&governing.server_path, &server)?;
        let mut local = base.to_path_buf();
        for segment in relative.split('/').filter(|s| !s.is_empty()) {
            local.push(segment);
        }
        Some(local)
    }

    /// Returns true if the server path lies beneath a cloak that is more
    /// specific than any mapping covering it.
    pub fn is_cloaked(&self, server_path: &str) -> bool {
        self.governing_folder(server_path)
            .is_some_and(WorkingFolder::is_cloaked)
    }

    /// Returns true if the server path resolves to a local path.
    pub fn is_mapped(&self, server_path: &str) -> bool {
        self.local_path_for(server_path).is_some()
    }

    fn governing_folder(&self, server_path: &str) -> Option<&WorkingFolder> {
        self.folders
            .iter()
            .filter(|f| path::is_server_sub_item(server_path, &f.server_path))
            .max_by_key(|f| path::server_depth(&f.server_path))
    }

    fn mappings(&self) -> impl Iterator<Item = &WorkingFolder> {
        self.folders.iter().filter(|f| !f.is_cloaked())
    }

    fn replace_or_push(&mut self, folder: WorkingFolder) {
        match self
            .folders
            .iter_mut()
            .find(|f| path::server_eq(&f.server_path, &folder.server_path))
        {
            Some(slot) => *slot = folder,
            None => self.folders.push(folder),
        }
    }
}

fn check_overlap(
    existing: &WorkingFolder,
    existing_local: &Path,
    server: &str,
    local: &Path,
) -> Result<()> {
    if path::local_eq(existing_local, local) {
        return Err(Error::Configuration(format!(
            "local folder {} is already mapped to {}",
            local.display(),
            existing.server_path
        )));
    }
    let nested_inside = path::is_local_sub_item(local, existing_local)
        && !path::is_server_sub_item(server, &existing.server_path);
    let nested_around = path::is_local_sub_item(existing_local, local)
        && !path::is_server_sub_item(&existing.server_path, server);
    if nested_inside || nested_around {
        return Err(Error::Configuration(format!(
            "{} -> {} partially overlaps {} -> {}",
            server,
            local.display(),
            existing.server_path,
            existing_local.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
