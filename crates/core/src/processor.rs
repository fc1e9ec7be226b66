// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Applies server-issued get operations to the local working copy.
//!
//! Each operation is classified by [`GetOperation::action`] and applied
//! according to the batch [`Direction`]:
//!
//! | action | normal | undo |
//! |---|---|---|
//! | add | nothing | delete the target |
//! | edit | make writable, record version | re-download, make read-only |
//! | get | download, make read-only, record version | nothing |
//! | rename | move unless already moved, record version | same as normal |
//! | delete | remove unless kept, record absent | same as get |
//!
//! One failing item never stops the batch. Recorded versions are queued
//! on a [`LocalVersionWriteBack`] and flushed once when the batch ends,
//! including after cancellation.

use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::fs::Filesystem;
use crate::item::ItemType;
use crate::operation::{Direction, GetAction, GetOperation, UpdateLocalVersion};
use crate::remote::RemoteStore;
use crate::writeback::LocalVersionWriteBack;

/// Per-batch switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    pub direction: Direction,
    /// Leave files on disk when the server deletes them.
    pub keep_local: bool,
    /// Record versions without touching file content.
    pub no_download: bool,
    /// Mark fetched files read-only.
    pub read_only: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            direction: Direction::Normal,
            keep_local: false,
            no_download: false,
            read_only: true,
        }
    }
}

impl ProcessOptions {
    pub fn undo() -> Self {
        ProcessOptions {
            direction: Direction::Undo,
            ..Self::default()
        }
    }
}

/// A local problem with one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFailure {
    pub item_id: i32,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl LocalFailure {
    fn new(op: &GetOperation, message: impl Into<String>) -> Self {
        LocalFailure {
            item_id: op.item_id,
            path: op.local_path().cloned(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LocalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => write!(f, "item {}: {}", self.item_id, self.message),
        }
    }
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Operations applied without a local failure.
    pub applied: usize,
    pub failures: Vec<LocalFailure>,
    /// The batch stopped early on request.
    pub cancelled: bool,
    /// Version updates written back at the end of the batch.
    pub flushed: usize,
}

impl ProcessReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    /// Item ids whose operation failed locally.
    pub fn failed_items(&self) -> Vec<i32> {
        self.failures.iter().map(|f| f.item_id).collect()
    }
}

type Applied = std::result::Result<Option<UpdateLocalVersion>, LocalFailure>;

/// Drives the per-operation apply state machine.
pub struct GetOperationProcessor<'a> {
    remote: &'a dyn RemoteStore,
    fs: &'a dyn Filesystem,
}

impl<'a> GetOperationProcessor<'a> {
    pub fn new(remote: &'a dyn RemoteStore, fs: &'a dyn Filesystem) -> Self {
        GetOperationProcessor { remote, fs }
    }

    pub fn remote(&self) -> &'a dyn RemoteStore {
        self.remote
    }

    /// Applies `operations` in order and flushes the recorded versions.
    ///
    /// Local failures are collected in the report, including a version
    /// that could not be journaled; it stays queued and is still flushed.
    /// Only a failed flush is returned as an error; in that case the
    /// unflushed updates stay on `writeback`.
    pub fn process(
        &self,
        operations: &[GetOperation],
        options: &ProcessOptions,
        writeback: &mut LocalVersionWriteBack,
        cancel: &CancellationToken,
    ) -> Result<ProcessReport> {
        let mut report = ProcessReport::default();

        for (index, op) in operations.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(
                    applied = report.applied,
                    remaining = operations.len() - index,
                    "batch cancelled"
                );
                report.cancelled = true;
                break;
            }

            match self.apply(op, options) {
                Ok(update) => {
                    report.applied += 1;
                    let Some(update) = update else { continue };
                    if let Err(e) = writeback.queue_update(update) {
                        let failure = LocalFailure::new(op, format!("version not journaled: {e}"));
                        tracing::warn!(item = failure.item_id, "{failure}");
                        report.failures.push(failure);
                    }
                }
                Err(failure) => {
                    tracing::warn!(item = failure.item_id, "{failure}");
                    report.failures.push(failure);
                }
            }
        }

        report.flushed = writeback.flush(self.remote)?;
        tracing::info!(
            direction = ?options.direction,
            applied = report.applied,
            failed = report.failures.len(),
            flushed = report.flushed,
            "processed get operations"
        );
        Ok(report)
    }

    fn apply(&self, op: &GetOperation, options: &ProcessOptions) -> Applied {
        let action = op.action();
        tracing::debug!(item = op.item_id, ?action, direction = ?options.direction, "applying");

        match (action, options.direction) {
            (GetAction::Add, Direction::Normal) => Ok(None),
            (GetAction::Add, Direction::Undo) => {
                if let Some(path) = op.target_local_path.as_deref() {
                    self.remove_quietly(op, path);
                }
                Ok(None)
            }
            (GetAction::Edit, Direction::Normal) => {
                let path = self.require_path(op)?;
                if self.fs.exists(path) && op.item_type == ItemType::File {
                    self.fs
                        .set_read_only(path, false)
                        .map_err(|e| LocalFailure::new(op, e.to_string()))?;
                }
                Ok(Some(UpdateLocalVersion::present(
                    op.item_id,
                    path.to_path_buf(),
                    op.server_version,
                )))
            }
            (GetAction::Edit, Direction::Undo) => {
                let path = self.require_path(op)?;
                self.fetch(op, path, options)?;
                Ok(None)
            }
            (GetAction::Get, Direction::Normal) | (GetAction::Delete, Direction::Undo) => {
                let path = self.require_path(op)?;
                self.fetch(op, path, options)?;
                Ok(Some(UpdateLocalVersion::present(
                    op.item_id,
                    path.to_path_buf(),
                    op.server_version,
                )))
            }
            (GetAction::Get, Direction::Undo) => Ok(None),
            (GetAction::Rename, _) => self.rename(op),
            (GetAction::Delete, Direction::Normal) => {
                let path = op
                    .source_local_path
                    .as_deref()
                    .or(op.target_local_path.as_deref());
                if let (false, Some(path)) = (options.keep_local, path) {
                    self.remove_quietly(op, path);
                }
                Ok(Some(UpdateLocalVersion::absent(op.item_id)))
            }
        }
    }

    fn require_path<'o>(
        &self,
        op: &'o GetOperation,
    ) -> std::result::Result<&'o Path, LocalFailure> {
        op.local_path()
            .map(PathBuf::as_path)
            .ok_or_else(|| LocalFailure::new(op, "operation has no local path"))
    }

    /// Deletes a file or folder, logging instead of failing.
    fn remove_quietly(&self, op: &GetOperation, path: &Path) {
        if !self.fs.exists(path) {
            return;
        }
        let result = if self.fs.is_dir(path) {
            self.fs.remove_dir_all(path)
        } else {
            // Read-only files cannot be removed on every platform
            let _ = self.fs.set_read_only(path, false);
            self.fs.remove_file(path)
        };
        if let Err(e) = result {
            tracing::warn!(item = op.item_id, path = %path.display(), error = %e, "delete failed");
        }
    }

    fn rename(&self, op: &GetOperation) -> Applied {
        let (Some(source), Some(target)) = (
            op.source_local_path.as_deref(),
            op.target_local_path.as_deref(),
        ) else {
            return Err(LocalFailure::new(op, "rename needs a source and a target"));
        };

        let moved_externally = !self.fs.exists(source) && self.fs.exists(target);
        if !moved_externally {
            if let Some(parent) = target.parent() {
                self.fs
                    .create_dir_all(parent)
                    .map_err(|e| LocalFailure::new(op, e.to_string()))?;
            }
            self.fs.rename(source, target).map_err(|e| {
                LocalFailure::new(op, format!("move from {}: {e}", source.display()))
            })?;
        }
        Ok(Some(UpdateLocalVersion::present(
            op.item_id,
            target.to_path_buf(),
            op.server_version,
        )))
    }

    /// Brings the content at `path` to the operation's server version.
    fn fetch(
        &self,
        op: &GetOperation,
        path: &Path,
        options: &ProcessOptions,
    ) -> std::result::Result<(), LocalFailure> {
        let io_failure = |e: std::io::Error| LocalFailure::new(op, e.to_string());

        if op.item_type == ItemType::Folder {
            return self.fs.create_dir_all(path).map_err(io_failure);
        }
        if options.no_download {
            return Ok(());
        }

        let uri = op
            .artifact_uri
            .as_deref()
            .ok_or_else(|| LocalFailure::new(op, "no download location"))?;
        let temp = self
            .remote
            .download_to_temp(uri)
            .map_err(|e| LocalFailure::new(op, format!("download failed: {e}")))?;

        if let Some(expected) = &op.content_hash {
            let content = self.fs.read(&temp).map_err(io_failure)?;
            let actual = hex::encode(Sha256::digest(&content));
            if !actual.eq_ignore_ascii_case(expected) {
                let _ = self.fs.remove_file(&temp);
                return Err(LocalFailure::new(
                    op,
                    format!("content hash mismatch: expected {expected}, got {actual}"),
                ));
            }
        }

        if let Some(parent) = path.parent() {
            self.fs.create_dir_all(parent).map_err(io_failure)?;
        }
        if self.fs.exists(path) {
            self.fs.set_read_only(path, false).map_err(io_failure)?;
        }
        self.fs.rename(&temp, path).map_err(io_failure)?;
        if options.read_only {
            self.fs.set_read_only(path, true).map_err(io_failure)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
