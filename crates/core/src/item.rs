// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core item types shared by every component of the sync engine.
//!
//! This module contains the value types that flow between the workspace,
//! the remote store and the local filesystem: item specs, change flags,
//! pending changes, extended item metadata, conflicts and soft failures.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path;

/// How deep a path-based query or change applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecursionType {
    /// Only the item itself.
    #[default]
    None,
    /// The item and its direct children.
    OneLevel,
    /// The item and everything beneath it.
    Full,
}

impl RecursionType {
    /// Returns true if `candidate` falls within `scope` at this depth.
    ///
    /// Both arguments are server paths.
    pub fn covers(&self, scope: &str, candidate: &str) -> bool {
        let scope = path::canonical_server(scope);
        let candidate = path::canonical_server(candidate);
        let (scope, candidate) = (scope.as_ref(), candidate.as_ref());
        if path::server_eq(scope, candidate) {
            return true;
        }
        match self {
            RecursionType::None => false,
            RecursionType::OneLevel => path::server_parent(candidate)
                .map(|parent| path::server_eq(&parent, scope))
                .unwrap_or(false),
            RecursionType::Full => path::is_server_sub_item(candidate, scope),
        }
    }
}

/// Whether an item is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    File,
    Folder,
}

impl ItemType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::File => "file",
            ItemType::Folder => "folder",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "file" => Ok(ItemType::File),
            "folder" => Ok(ItemType::Folder),
            _ => Err(Error::InvalidInput(format!("invalid item type: '{s}'"))),
        }
    }
}

/// Immutable description of a query or change scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    /// Server path (or local path before resolution).
    pub path: String,
    pub recursion: RecursionType,
}

impl ItemSpec {
    pub fn new(path: impl Into<String>, recursion: RecursionType) -> Self {
        ItemSpec {
            path: path.into(),
            recursion,
        }
    }

    /// A spec for the item alone.
    pub fn single(path: impl Into<String>) -> Self {
        Self::new(path, RecursionType::None)
    }

    /// A spec for the item and everything beneath it.
    pub fn full(path: impl Into<String>) -> Self {
        Self::new(path, RecursionType::Full)
    }

    /// Returns true if the server path `candidate` is inside this scope.
    pub fn matches(&self, candidate: &str) -> bool {
        self.recursion.covers(&self.path, candidate)
    }
}

/// Set of combinable change flags.
///
/// A pending change or get operation may carry several flags at once
/// (`edit | rename`, `add | lock`, ...). Named predicates answer whether a
/// particular flag is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeType(u32);

impl ChangeType {
    pub const NONE: ChangeType = ChangeType(0);
    pub const ADD: ChangeType = ChangeType(1 << 0);
    pub const EDIT: ChangeType = ChangeType(1 << 1);
    pub const ENCODING: ChangeType = ChangeType(1 << 2);
    pub const RENAME: ChangeType = ChangeType(1 << 3);
    pub const DELETE: ChangeType = ChangeType(1 << 4);
    pub const UNDELETE: ChangeType = ChangeType(1 << 5);
    pub const BRANCH: ChangeType = ChangeType(1 << 6);
    pub const MERGE: ChangeType = ChangeType(1 << 7);
    pub const LOCK: ChangeType = ChangeType(1 << 8);

    const NAMES: [(ChangeType, &'static str); 9] = [
        (ChangeType::ADD, "add"),
        (ChangeType::EDIT, "edit"),
        (ChangeType::ENCODING, "encoding"),
        (ChangeType::RENAME, "rename"),
        (ChangeType::DELETE, "delete"),
        (ChangeType::UNDELETE, "undelete"),
        (ChangeType::BRANCH, "branch"),
        (ChangeType::MERGE, "merge"),
        (ChangeType::LOCK, "lock"),
    ];

    /// Raw bit representation.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Builds a flag set from raw bits, dropping unknown bits.
    pub fn from_bits(bits: u32) -> Self {
        let known = Self::NAMES.iter().fold(0, |acc, (flag, _)| acc | flag.0);
        ChangeType(bits & known)
    }

    /// Returns true if every flag in `other` is set.
    pub fn contains(&self, other: ChangeType) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns a copy with the flags in `other` cleared.
    pub fn without(&self, other: ChangeType) -> Self {
        ChangeType(self.0 & !other.0)
    }

    pub fn is_add(&self) -> bool {
        self.contains(ChangeType::ADD)
    }

    pub fn is_edit(&self) -> bool {
        self.contains(ChangeType::EDIT)
    }

    pub fn is_encoding(&self) -> bool {
        self.contains(ChangeType::ENCODING)
    }

    pub fn is_rename(&self) -> bool {
        self.contains(ChangeType::RENAME)
    }

    pub fn is_delete(&self) -> bool {
        self.contains(ChangeType::DELETE)
    }

    pub fn is_undelete(&self) -> bool {
        self.contains(ChangeType::UNDELETE)
    }

    pub fn is_branch(&self) -> bool {
        self.contains(ChangeType::BRANCH)
    }

    pub fn is_merge(&self) -> bool {
        self.contains(ChangeType::MERGE)
    }

    pub fn is_lock(&self) -> bool {
        self.contains(ChangeType::LOCK)
    }

    /// Returns true if the change carries file content to upload on check-in.
    pub fn has_content(&self) -> bool {
        self.is_add() || self.is_edit() || self.is_merge() || self.is_branch()
    }
}

impl BitOr for ChangeType {
    type Output = ChangeType;

    fn bitor(self, rhs: ChangeType) -> ChangeType {
        ChangeType(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeType {
    fn bitor_assign(&mut self, rhs: ChangeType) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join(", "))
    }
}

impl FromStr for ChangeType {
    type Err = Error;

    /// Parses a comma-separated list such as `"edit, rename"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut result = ChangeType::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let lower = part.to_lowercase();
            if lower == "none" {
                continue;
            }
            let flag = Self::NAMES
                .iter()
                .find(|(_, name)| *name == lower)
                .map(|(flag, _)| *flag)
                .ok_or_else(|| Error::InvalidChangeType(part.to_string()))?;
            result |= flag;
        }
        Ok(result)
    }
}

/// Lock requested for a pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockLevel {
    #[default]
    None,
    /// Others may edit but not check in.
    CheckIn,
    /// Others may neither edit nor check in.
    CheckOut,
    /// Keep whatever lock is already held.
    Unchanged,
}

impl LockLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockLevel::None => "none",
            LockLevel::CheckIn => "checkin",
            LockLevel::CheckOut => "checkout",
            LockLevel::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for LockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LockLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(LockLevel::None),
            "checkin" => Ok(LockLevel::CheckIn),
            "checkout" => Ok(LockLevel::CheckOut),
            "unchanged" => Ok(LockLevel::Unchanged),
            _ => Err(Error::InvalidInput(format!(
                "invalid lock level: '{s}'\n  hint: valid levels are: none, checkin, checkout"
            ))),
        }
    }
}

/// A staged, not-yet-committed local mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChange {
    pub server_path: String,
    pub local_path: Option<PathBuf>,
    pub change_type: ChangeType,
    pub item_type: ItemType,
    #[serde(default)]
    pub lock_level: LockLevel,
    /// Previous server path when the change includes a rename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_server_path: Option<String>,
    #[serde(default)]
    pub item_id: i32,
    #[serde(default)]
    pub version: i32,
}

impl PendingChange {
    pub fn new(
        server_path: impl Into<String>,
        local_path: Option<PathBuf>,
        change_type: ChangeType,
        item_type: ItemType,
    ) -> Self {
        PendingChange {
            server_path: server_path.into(),
            local_path,
            change_type,
            item_type,
            lock_level: LockLevel::None,
            source_server_path: None,
            item_id: 0,
            version: 0,
        }
    }
}

/// A request to pend a change on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub item: ItemSpec,
    pub change_type: ChangeType,
    pub item_type: ItemType,
    #[serde(default)]
    pub lock_level: LockLevel,
    /// New server path for renames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_server_path: Option<String>,
}

impl ChangeRequest {
    pub fn new(item: ItemSpec, change_type: ChangeType, item_type: ItemType) -> Self {
        ChangeRequest {
            item,
            change_type,
            item_type,
            lock_level: LockLevel::None,
            target_server_path: None,
        }
    }
}

/// Which server version to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum VersionSpec {
    #[default]
    Latest,
    Changeset(i32),
}

impl FromStr for VersionSpec {
    type Err = Error;

    /// Parses `T`/`latest` or `C<number>`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("t") || trimmed.eq_ignore_ascii_case("latest") {
            return Ok(VersionSpec::Latest);
        }
        let digits = trimmed
            .strip_prefix('C')
            .or_else(|| trimmed.strip_prefix('c'))
            .unwrap_or(trimmed);
        digits
            .parse()
            .map(VersionSpec::Changeset)
            .map_err(|_| Error::InvalidInput(format!("invalid version spec: '{s}'")))
    }
}

/// One item to bring up to a given version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequest {
    pub item: ItemSpec,
    #[serde(default)]
    pub version: VersionSpec,
}

impl GetRequest {
    pub fn new(item: ItemSpec, version: VersionSpec) -> Self {
        GetRequest { item, version }
    }
}

/// Plain item metadata returned by an item query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i32,
    pub server_path: String,
    pub item_type: ItemType,
    pub changeset: i32,
    #[serde(default)]
    pub deletion_id: i32,
    #[serde(default)]
    pub content_length: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_uri: Option<String>,
}

/// Item metadata enriched with workspace state. Cached by [`crate::WorkspaceCache`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedItem {
    pub server_path: String,
    pub local_path: Option<PathBuf>,
    pub item_type: ItemType,
    pub change_type: ChangeType,
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_owner: Option<String>,
    pub has_other_pending_change: bool,
    pub version_local: i32,
    pub version_latest: i32,
    #[serde(default)]
    pub deletion_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_server_path: Option<String>,
}

impl ExtendedItem {
    /// Returns true if the local copy lags behind the latest server version.
    pub fn is_out_of_date(&self) -> bool {
        self.local_path.is_some() && self.version_local < self.version_latest
    }
}

/// How bad a per-item failure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A soft, per-item problem reported alongside a successful remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl Failure {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.server_path {
            Some(item) => write!(f, "{level}: {item}: {} ({})", self.message, self.code),
            None => write!(f, "{level}: {} ({})", self.message, self.code),
        }
    }
}

/// Returns true if any failure in the list has error severity.
pub fn has_errors(failures: &[Failure]) -> bool {
    failures.iter().any(Failure::is_error)
}

/// Work item association attached to a check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemLink {
    pub id: i32,
    /// Whether the check-in resolves the work item or only associates with it.
    #[serde(default)]
    pub resolve: bool,
}

/// Outcome of a check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInResult {
    /// New changeset number; zero when nothing was committed.
    pub changeset: i32,
    #[serde(default)]
    pub failures: Vec<Failure>,
}

impl CheckInResult {
    pub fn is_committed(&self) -> bool {
        self.changeset > 0
    }
}

/// Kind of divergence detected between local and server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Get,
    CheckIn,
    Local,
    Merge,
}

/// A divergence that needs an explicit resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub conflict_id: i32,
    pub item_id: i32,
    pub conflict_type: ConflictType,
    pub target_local_path: Option<PathBuf>,
    pub your_server_path: String,
    pub their_server_path: String,
    pub base_version: i32,
    pub their_version: i32,
    pub your_version: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_download_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub their_download_uri: Option<String>,
}

/// How to settle a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Keep the local content.
    AcceptYours,
    /// Replace the local content with the server's.
    AcceptTheirs,
    /// The local file already holds merged content.
    Merge,
}

impl Resolution {
    /// Returns true if resolving this way must fetch server content.
    pub fn downloads(&self) -> bool {
        matches!(self, Resolution::AcceptTheirs)
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "accept_yours" | "yours" | "local" => Ok(Resolution::AcceptYours),
            "accept_theirs" | "theirs" | "server" => Ok(Resolution::AcceptTheirs),
            "merge" => Ok(Resolution::Merge),
            _ => Err(Error::InvalidInput(format!(
                "invalid resolution: '{s}'\n  hint: valid resolutions are: yours, theirs, merge"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
