// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server-issued get operations and the local-version records they produce.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::item::{ChangeType, ItemType};

/// An instruction from the server describing how to bring one local item in
/// sync with a server version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOperation {
    pub item_id: i32,
    #[serde(default)]
    pub change_type: ChangeType,
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_local_path: Option<PathBuf>,
    /// Where the item should live afterwards; absent when it must go away.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_local_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_server_path: Option<String>,
    #[serde(default)]
    pub target_server_path: String,
    pub server_version: i32,
    #[serde(default)]
    pub deletion_id: i32,
    /// Download locator for file content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_uri: Option<String>,
    /// Hex SHA-256 of the file content, when the server knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl GetOperation {
    /// Classifies this operation for the apply state machine.
    ///
    /// A missing target or a delete flag means the item leaves the
    /// workspace. A rename flag only counts when the local location
    /// actually changes.
    pub fn action(&self) -> GetAction {
        if self.change_type.is_delete() || self.target_local_path.is_none() {
            return GetAction::Delete;
        }
        if self.change_type.is_rename()
            && self.source_local_path.is_some()
            && self.source_local_path != self.target_local_path
        {
            return GetAction::Rename;
        }
        if self.change_type.is_add() {
            return GetAction::Add;
        }
        if self.change_type.is_edit() {
            return GetAction::Edit;
        }
        GetAction::Get
    }

    /// The path the operation acts on: the target if present, else the source.
    pub fn local_path(&self) -> Option<&PathBuf> {
        self.target_local_path
            .as_ref()
            .or(self.source_local_path.as_ref())
    }
}

/// Apply-state-machine classification of a [`GetOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetAction {
    Add,
    Edit,
    Get,
    Rename,
    Delete,
}

/// Which way a batch of operations is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Bring the server's state down.
    #[default]
    Normal,
    /// Roll back pending local changes.
    Undo,
}

/// Authoritative ledger entry after an operation completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLocalVersion {
    pub item_id: i32,
    /// `None` means the item is not present locally.
    pub local_path: Option<PathBuf>,
    pub server_version: i32,
}

impl UpdateLocalVersion {
    pub fn present(item_id: i32, local_path: PathBuf, server_version: i32) -> Self {
        UpdateLocalVersion {
            item_id,
            local_path: Some(local_path),
            server_version,
        }
    }

    /// A record saying the item no longer exists locally.
    pub fn absent(item_id: i32) -> Self {
        UpdateLocalVersion {
            item_id,
            local_path: None,
            server_version: 0,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.local_path.is_none()
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
