// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The workspace handle.
//!
//! A [`Workspace`] wires the mapper, the pending-change tracker, the item
//! cache and the conflict set to a remote store and a filesystem. Every
//! mutating operation holds one lock from staging through the final
//! write-back flush, so batches against the same workspace never overlap.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::WorkspaceCache;
use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::conflict::{ConflictResolver, ResolveReport};
use crate::error::{Error, Result};
use crate::fs::Filesystem;
use crate::item::{
    has_errors, ChangeRequest, ChangeType, CheckInResult, Conflict, ExtendedItem, Failure,
    GetRequest, Item, ItemSpec, ItemType, LockLevel, PendingChange, RecursionType, Resolution,
    VersionSpec, WorkItemLink,
};
use crate::mapping::{PathMapper, WorkingFolder, WorkspaceId, WorkspaceInfo};
use crate::operation::{Direction, GetOperation};
use crate::path;
use crate::pending::PendingChangeTracker;
use crate::processor::{GetOperationProcessor, ProcessOptions, ProcessReport};
use crate::remote::RemoteStore;
use crate::writeback::LocalVersionWriteBack;

/// Outcome of pending or undoing changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendReport {
    /// Soft failures reported by the server.
    pub failures: Vec<Failure>,
    /// Result of applying the returned operations locally.
    pub process: ProcessReport,
}

impl PendReport {
    /// Returns true if the server or the local apply reported an error.
    pub fn has_errors(&self) -> bool {
        has_errors(&self.failures) || !self.process.failures.is_empty()
    }
}

/// Handle to one workspace.
pub struct Workspace {
    id: WorkspaceId,
    computer: String,
    comment: Option<String>,
    mapper: Mutex<PathMapper>,
    pending: PendingChangeTracker,
    conflicts: ConflictResolver,
    cache: Arc<WorkspaceCache>,
    remote: Arc<dyn RemoteStore>,
    fs: Arc<dyn Filesystem>,
    config: EngineConfig,
    op_lock: Mutex<()>,
}

impl Workspace {
    /// Builds a handle from persisted workspace information.
    pub fn new(
        info: WorkspaceInfo,
        remote: Arc<dyn RemoteStore>,
        fs: Arc<dyn Filesystem>,
        cache: Arc<WorkspaceCache>,
        config: EngineConfig,
    ) -> Result<Self> {
        let mapper = PathMapper::from_folders(&info.folders)?;
        Ok(Workspace {
            id: info.id(),
            computer: info.computer,
            comment: info.comment,
            mapper: Mutex::new(mapper),
            pending: PendingChangeTracker::new(),
            conflicts: ConflictResolver::new(),
            cache,
            remote,
            fs,
            config,
            op_lock: Mutex::new(()),
        })
    }

    /// Builds a handle and writes back any version updates an interrupted
    /// batch left in the journal.
    pub fn attach(
        info: WorkspaceInfo,
        remote: Arc<dyn RemoteStore>,
        fs: Arc<dyn Filesystem>,
        cache: Arc<WorkspaceCache>,
        config: EngineConfig,
    ) -> Result<Self> {
        let workspace = Self::new(info, remote, fs, cache, config)?;
        let recovered = workspace.flush_journal()?;
        tracing::debug!(workspace = %workspace.id, recovered, "attached workspace");
        Ok(workspace)
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<WorkspaceCache> {
        &self.cache
    }

    /// Current workspace information, including its working folders.
    pub fn info(&self) -> WorkspaceInfo {
        self.info_with(self.mapper().folders().to_vec())
    }

    pub fn folders(&self) -> Vec<WorkingFolder> {
        self.mapper().folders().to_vec()
    }

    fn info_with(&self, folders: Vec<WorkingFolder>) -> WorkspaceInfo {
        WorkspaceInfo {
            name: self.id.name.clone(),
            owner: self.id.owner.clone(),
            computer: self.computer.clone(),
            comment: self.comment.clone(),
            folders,
        }
    }

    fn mapper(&self) -> MutexGuard<'_, PathMapper> {
        self.mapper.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn serialize(&self) -> MutexGuard<'_, ()> {
        self.op_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Working folders
    // ─────────────────────────────────────────────────────────────────────

    /// Maps a server folder to a local folder and registers the change.
    pub fn map(&self, server_path: &str, local_path: &Path) -> Result<()> {
        self.update_mapping(|m| m.map(server_path, local_path))?;
        tracing::info!(
            workspace = %self.id,
            server = server_path,
            local = %local_path.display(),
            "mapped working folder"
        );
        Ok(())
    }

    /// Removes the working folder for a server or local path.
    pub fn unmap(&self, target: &str) -> Result<WorkingFolder> {
        let removed = self.update_mapping(|m| m.unmap(target))?;
        tracing::info!(
            workspace = %self.id,
            server = %removed.server_path,
            "unmapped working folder"
        );
        Ok(removed)
    }

    /// Cloaks a server folder beneath an existing mapping.
    pub fn cloak(&self, server_path: &str) -> Result<()> {
        self.update_mapping(|m| m.cloak(server_path))?;
        tracing::info!(workspace = %self.id, server = server_path, "cloaked working folder");
        Ok(())
    }

    /// Applies `change` to a copy of the mapper and commits it only after
    /// the server accepted the new folder list.
    fn update_mapping<T>(&self, change: impl FnOnce(&mut PathMapper) -> Result<T>) -> Result<T> {
        let _guard = self.serialize();
        let mut next = self.mapper().clone();
        let value = change(&mut next)?;
        self.remote
            .update_workspace(&self.info_with(next.folders().to_vec()))?;
        *self.mapper() = next;
        Ok(value)
    }

    pub fn server_path_for(&self, local_path: &Path) -> Option<String> {
        self.mapper().server_path_for(local_path)
    }

    pub fn local_path_for(&self, server_path: &str) -> Option<PathBuf> {
        self.mapper().local_path_for(server_path)
    }

    fn require_server_path(&self, local_path: &Path) -> Result<String> {
        self.server_path_for(local_path)
            .ok_or_else(|| Error::NotMapped(local_path.display().to_string()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pending changes
    // ─────────────────────────────────────────────────────────────────────

    /// Pends adds for local files and folders. With `recursive`, folders
    /// bring everything beneath them that is mapped and not cloaked.
    pub fn pend_add(
        &self,
        local_paths: &[PathBuf],
        recursive: bool,
        cancel: &CancellationToken,
    ) -> Result<PendReport> {
        let mut changes = Vec::new();
        for local in local_paths {
            let server = self.require_server_path(local)?;
            let is_dir = self.fs.is_dir(local);
            changes.push(self.change(&server, local, ChangeType::ADD, item_type(is_dir)));
            if !(recursive && is_dir) {
                continue;
            }
            let entries = self
                .fs
                .walk(local)
                .map_err(|e| Error::local_io(local, e))?;
            for entry in entries {
                // Cloaked entries resolve to nothing and are left alone
                if let Some(server) = self.server_path_for(&entry.path) {
                    changes.push(self.change(
                        &server,
                        &entry.path,
                        ChangeType::ADD,
                        item_type(entry.is_dir),
                    ));
                }
            }
        }
        self.pend(changes, cancel)
    }

    /// Pends edits; the files become writable.
    pub fn pend_edit(
        &self,
        local_paths: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<PendReport> {
        let changes = local_paths
            .iter()
            .map(|local| {
                let server = self.require_server_path(local)?;
                Ok(self.change(&server, local, ChangeType::EDIT, ItemType::File))
            })
            .collect::<Result<Vec<_>>>()?;
        self.pend(changes, cancel)
    }

    /// Pends deletes; the server answers with operations that remove the
    /// local copies.
    pub fn pend_delete(
        &self,
        local_paths: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<PendReport> {
        let changes = local_paths
            .iter()
            .map(|local| {
                let server = self.require_server_path(local)?;
                let kind = item_type(self.fs.is_dir(local));
                Ok(self.change(&server, local, ChangeType::DELETE, kind))
            })
            .collect::<Result<Vec<_>>>()?;
        self.pend(changes, cancel)
    }

    /// Pends a rename from one mapped local path to another.
    pub fn pend_rename(
        &self,
        from: &Path,
        to: &Path,
        cancel: &CancellationToken,
    ) -> Result<PendReport> {
        let source = self.require_server_path(from)?;
        let target = self.require_server_path(to)?;
        let kind = item_type(self.fs.is_dir(from));

        let (mut request, mut change) = self.change(&source, to, ChangeType::RENAME, kind);
        request.target_server_path = Some(target.clone());
        change.server_path = target;
        change.source_server_path = Some(source);

        self.pend(vec![(request, change)], cancel)
    }

    /// Pends locks at `level`.
    pub fn lock(
        &self,
        local_paths: &[PathBuf],
        level: LockLevel,
        cancel: &CancellationToken,
    ) -> Result<PendReport> {
        let changes = local_paths
            .iter()
            .map(|local| {
                let server = self.require_server_path(local)?;
                let kind = item_type(self.fs.is_dir(local));
                let (mut request, mut change) = self.change(&server, local, ChangeType::LOCK, kind);
                request.lock_level = level;
                change.lock_level = level;
                Ok((request, change))
            })
            .collect::<Result<Vec<_>>>()?;
        self.pend(changes, cancel)
    }

    fn change(
        &self,
        server: &str,
        local: &Path,
        change_type: ChangeType,
        kind: ItemType,
    ) -> (ChangeRequest, PendingChange) {
        (
            ChangeRequest::new(ItemSpec::single(server), change_type, kind),
            PendingChange::new(server, Some(local.to_path_buf()), change_type, kind),
        )
    }

    /// Stages, submits and applies one set of changes under the workspace
    /// lock.
    fn pend(
        &self,
        changes: Vec<(ChangeRequest, PendingChange)>,
        cancel: &CancellationToken,
    ) -> Result<PendReport> {
        if changes.is_empty() {
            return Ok(PendReport::default());
        }
        let _guard = self.serialize();

        let (requests, staged): (Vec<_>, Vec<_>) = changes.into_iter().unzip();
        let paths: Vec<String> = staged.iter().map(|c| c.server_path.clone()).collect();
        for change in staged {
            self.pending.stage(change);
        }

        let outcome = match self.remote.pend_changes(&self.id, &requests) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.pending.remove(&paths);
                return Err(e.into());
            }
        };

        let rejected: Vec<String> = outcome
            .failures
            .iter()
            .filter(|f| f.is_error())
            .filter_map(|f| f.server_path.clone())
            .collect();
        for failure in &outcome.failures {
            tracing::warn!(workspace = %self.id, "{failure}");
        }
        self.pending.remove(&rejected);

        let process = self.apply(&outcome.operations, self.options(Direction::Normal), cancel)?;
        self.refresh_cache(&paths);
        tracing::info!(
            workspace = %self.id,
            requested = requests.len(),
            rejected = rejected.len(),
            "pended changes"
        );
        Ok(PendReport {
            failures: outcome.failures,
            process,
        })
    }

    /// Rolls back pending changes in `specs` on the server and locally.
    pub fn undo(&self, specs: &[ItemSpec], cancel: &CancellationToken) -> Result<PendReport> {
        let _guard = self.serialize();
        let outcome = self.remote.undo_pending_changes(&self.id, specs)?;
        let process = self.apply(&outcome.operations, self.options(Direction::Undo), cancel)?;

        let undone: Vec<String> = specs
            .iter()
            .flat_map(|spec| self.pending.changes(spec))
            .map(|c| c.server_path)
            .collect();
        self.pending.remove(&undone);
        self.refresh_cache(&undone);
        tracing::info!(workspace = %self.id, undone = undone.len(), "undid pending changes");
        Ok(PendReport {
            failures: outcome.failures,
            process,
        })
    }

    /// Staged changes inside `scope`.
    pub fn pending_changes(&self, scope: &ItemSpec) -> Vec<PendingChange> {
        self.pending.changes(scope)
    }

    /// Replaces the staged set with the server's list for every mapped folder.
    pub fn refresh_pending(&self) -> Result<Vec<PendingChange>> {
        let specs = self.mapped_specs();
        if specs.is_empty() {
            self.pending.clear();
            return Ok(Vec::new());
        }
        let server_set = self.remote.query_pending_changes(&self.id, &specs)?;
        tracing::debug!(
            workspace = %self.id,
            count = server_set.len(),
            "reconciled pending changes"
        );
        self.pending.reconcile(server_set);
        Ok(self.pending.all())
    }

    fn mapped_specs(&self) -> Vec<ItemSpec> {
        self.mapper()
            .folders()
            .iter()
            .filter(|f| !f.is_cloaked())
            .map(|f| ItemSpec::full(f.server_path.clone()))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Get and check-in
    // ─────────────────────────────────────────────────────────────────────

    /// Brings items to the requested versions.
    ///
    /// With `no_get` the server records the versions but file content is
    /// left untouched.
    pub fn get(
        &self,
        requests: &[GetRequest],
        force: bool,
        no_get: bool,
        cancel: &CancellationToken,
    ) -> Result<ProcessReport> {
        let _guard = self.serialize();
        let operations = self.remote.get(&self.id, requests, force, no_get)?;
        let options = ProcessOptions {
            no_download: no_get,
            ..self.options(Direction::Normal)
        };
        let report = self.apply(&operations, options, cancel)?;
        self.refresh_cache(&touched_paths(&operations));
        Ok(report)
    }

    /// Uploads content and commits the staged changes inside `scope`.
    pub fn check_in(
        &self,
        scope: &[ItemSpec],
        comment: &str,
        work_items: &[WorkItemLink],
    ) -> Result<CheckInResult> {
        let _guard = self.serialize();

        let mut changes: Vec<PendingChange> = Vec::new();
        for change in scope.iter().flat_map(|spec| self.pending.changes(spec)) {
            if !changes
                .iter()
                .any(|c| path::server_eq(&c.server_path, &change.server_path))
            {
                changes.push(change);
            }
        }
        if changes.is_empty() {
            return Err(Error::InvalidInput(
                "no pending changes to check in\n  hint: pend a change with 'tfs add' or 'tfs edit'"
                    .to_string(),
            ));
        }

        for change in &changes {
            if let Some(local) = uploadable(change) {
                let content = self.fs.read(local).map_err(|e| Error::local_io(local, e))?;
                self.remote
                    .upload_file(&self.id, &change.server_path, &content)?;
            }
        }

        let paths: Vec<String> = changes.iter().map(|c| c.server_path.clone()).collect();
        let result = self.remote.check_in(&self.id, &paths, comment, work_items)?;
        for failure in &result.failures {
            tracing::warn!(workspace = %self.id, "{failure}");
        }
        if !result.is_committed() {
            return Ok(result);
        }

        self.pending.remove(&paths);
        if self.config.read_only_gets {
            for local in changes.iter().filter_map(uploadable) {
                if let Err(e) = self.fs.set_read_only(local, true) {
                    tracing::warn!(path = %local.display(), error = %e, "could not mark read-only");
                }
            }
        }
        self.refresh_cache(&paths);
        tracing::info!(
            workspace = %self.id,
            changeset = result.changeset,
            items = paths.len(),
            "checked in"
        );
        Ok(result)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Items
    // ─────────────────────────────────────────────────────────────────────

    /// Plain item metadata straight from the server.
    pub fn query_items(&self, specs: &[ItemSpec], version: VersionSpec) -> Result<Vec<Item>> {
        Ok(self.remote.query_items(&self.id, specs, version)?)
    }

    /// Extended metadata, served from the cache where possible.
    pub fn items(&self, paths: &[String], recursion: RecursionType) -> Result<Vec<ExtendedItem>> {
        self.cache.get_items(&self.id, paths, recursion)
    }

    /// Re-fetches extended metadata, bypassing the cache.
    pub fn refresh_items(&self, paths: &[String]) -> Result<Vec<ExtendedItem>> {
        self.cache.refresh_items(&self.id, paths)
    }

    /// Refreshes cached rows after a change; a failed refresh only drops them.
    fn refresh_cache(&self, paths: &[String]) {
        if let Err(e) = self.cache.refresh_items(&self.id, paths) {
            tracing::warn!(workspace = %self.id, error = %e, "item cache refresh failed");
            if let Err(e) = self.cache.invalidate(&self.id, paths) {
                tracing::warn!(workspace = %self.id, error = %e, "item cache invalidation failed");
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Conflicts
    // ─────────────────────────────────────────────────────────────────────

    /// Queries conflicts in `specs`; they become the active set.
    pub fn conflicts(&self, specs: &[ItemSpec]) -> Result<Vec<Conflict>> {
        self.conflicts.query(&self.processor(), &self.id, specs)
    }

    /// Conflicts found by the last query and not yet resolved.
    pub fn active_conflicts(&self) -> Vec<Conflict> {
        self.conflicts.active()
    }

    pub fn resolve(
        &self,
        conflict_id: i32,
        resolution: Resolution,
        cancel: &CancellationToken,
    ) -> Result<ResolveReport> {
        let _guard = self.serialize();
        let conflict = self.conflicts.get(conflict_id);
        let mut writeback = self.writeback()?;
        let report = self.conflicts.resolve(
            &self.processor(),
            conflict_id,
            resolution,
            &self.options(Direction::Normal),
            &mut writeback,
            cancel,
        )?;
        if let Some(conflict) = conflict {
            self.refresh_cache(&[conflict.your_server_path]);
        }
        Ok(report)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Apply and write-back
    // ─────────────────────────────────────────────────────────────────────

    /// Writes back version updates left in the journal; returns how many.
    pub fn flush_journal(&self) -> Result<usize> {
        if self.config.journal.is_none() {
            return Ok(0);
        }
        let _guard = self.serialize();
        let mut writeback = self.writeback()?;
        writeback.flush(self.remote.as_ref())
    }

    fn processor(&self) -> GetOperationProcessor<'_> {
        GetOperationProcessor::new(self.remote.as_ref(), self.fs.as_ref())
    }

    fn options(&self, direction: Direction) -> ProcessOptions {
        ProcessOptions {
            direction,
            read_only: self.config.read_only_gets,
            ..ProcessOptions::default()
        }
    }

    /// A write-back queue for one batch. Updates left by an earlier failed
    /// flush are picked up from the journal and sent first.
    fn writeback(&self) -> Result<LocalVersionWriteBack> {
        let writeback = match &self.config.journal {
            Some(journal) => LocalVersionWriteBack::recover(self.id.clone(), journal)?,
            None => LocalVersionWriteBack::new(self.id.clone()),
        };
        Ok(writeback.with_chunk_size(self.config.write_back_chunk_size))
    }

    fn apply(
        &self,
        operations: &[GetOperation],
        options: ProcessOptions,
        cancel: &CancellationToken,
    ) -> Result<ProcessReport> {
        let mut writeback = self.writeback()?;
        self.processor()
            .process(operations, &options, &mut writeback, cancel)
    }
}

fn item_type(is_dir: bool) -> ItemType {
    if is_dir {
        ItemType::Folder
    } else {
        ItemType::File
    }
}

/// Local file whose content a check-in must upload.
fn uploadable(change: &PendingChange) -> Option<&Path> {
    if change.item_type != ItemType::File || !change.change_type.has_content() {
        return None;
    }
    if change.change_type.is_delete() {
        return None;
    }
    change.local_path.as_deref()
}

fn touched_paths(operations: &[GetOperation]) -> Vec<String> {
    operations
        .iter()
        .map(|op| op.target_server_path.clone())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
