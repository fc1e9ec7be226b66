// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers: an in-memory [`RemoteStore`] and item builders.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::item::{
    ChangeRequest, ChangeType, CheckInResult, Conflict, ConflictType, ExtendedItem, GetRequest,
    Item, ItemSpec, ItemType, PendingChange, Resolution, VersionSpec, WorkItemLink,
};
use crate::mapping::{WorkspaceId, WorkspaceInfo};
use crate::operation::{GetOperation, UpdateLocalVersion};
use crate::remote::{PendOutcome, RemoteError, RemoteResult, RemoteStore, ResolveOutcome};

/// Canned responses and recorded calls of a [`MockRemote`].
#[derive(Debug, Default)]
pub struct MockState {
    pub items: Vec<Item>,
    pub extended_items: Vec<ExtendedItem>,
    pub server_pending: Vec<PendingChange>,
    pub pend_outcome: PendOutcome,
    pub undo_outcome: PendOutcome,
    pub get_operations: Vec<GetOperation>,
    pub check_in_result: Option<CheckInResult>,
    pub conflicts: Vec<Conflict>,
    pub resolve_outcome: ResolveOutcome,
    /// Artifact contents by URI; unknown URIs fail to download.
    pub artifacts: HashMap<String, Vec<u8>>,
    /// Zero-based index of the `update_local_version` call that fails.
    pub fail_version_update_call: Option<usize>,
    pub fail_check_in: Option<RemoteError>,

    pub calls: Vec<&'static str>,
    pub version_updates: Vec<Vec<UpdateLocalVersion>>,
    pub pend_requests: Vec<ChangeRequest>,
    pub get_requests: Vec<GetRequest>,
    pub undo_specs: Vec<ItemSpec>,
    pub uploads: Vec<(String, Vec<u8>)>,
    pub checked_in: Vec<String>,
    pub check_in_comments: Vec<String>,
    pub resolved: Vec<(i32, Resolution)>,
    pub workspace_updates: Vec<WorkspaceInfo>,
}

impl MockState {
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| **c == name).count()
    }

    /// All updates flushed so far, in order.
    pub fn flushed(&self) -> Vec<UpdateLocalVersion> {
        self.version_updates.iter().flatten().cloned().collect()
    }
}

/// In-memory remote store for tests.
#[derive(Debug)]
pub struct MockRemote {
    download_dir: PathBuf,
    state: Mutex<MockState>,
}

impl MockRemote {
    /// Downloads are written under `download_dir`.
    pub fn new(download_dir: &Path) -> Self {
        MockRemote {
            download_dir: download_dir.to_path_buf(),
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn record(&self, name: &'static str) -> MutexGuard<'_, MockState> {
        let mut state = self.state();
        state.calls.push(name);
        state
    }
}

impl RemoteStore for MockRemote {
    fn query_items(
        &self,
        _workspace: &WorkspaceId,
        specs: &[ItemSpec],
        _version: VersionSpec,
    ) -> RemoteResult<Vec<Item>> {
        let state = self.record("query_items");
        Ok(state
            .items
            .iter()
            .filter(|i| specs.iter().any(|s| s.matches(&i.server_path)))
            .cloned()
            .collect())
    }

    fn query_items_extended(
        &self,
        _workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<ExtendedItem>> {
        let state = self.record("query_items_extended");
        Ok(state
            .extended_items
            .iter()
            .filter(|i| specs.iter().any(|s| s.matches(&i.server_path)))
            .cloned()
            .collect())
    }

    fn query_pending_changes(
        &self,
        _workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<PendingChange>> {
        let state = self.record("query_pending_changes");
        Ok(state
            .server_pending
            .iter()
            .filter(|c| specs.iter().any(|s| s.matches(&c.server_path)))
            .cloned()
            .collect())
    }

    fn pend_changes(
        &self,
        _workspace: &WorkspaceId,
        changes: &[ChangeRequest],
    ) -> RemoteResult<PendOutcome> {
        let mut state = self.record("pend_changes");
        state.pend_requests.extend_from_slice(changes);
        Ok(state.pend_outcome.clone())
    }

    fn undo_pending_changes(
        &self,
        _workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<PendOutcome> {
        let mut state = self.record("undo_pending_changes");
        state.undo_specs.extend_from_slice(specs);
        Ok(state.undo_outcome.clone())
    }

    fn get(
        &self,
        _workspace: &WorkspaceId,
        requests: &[GetRequest],
        _force: bool,
        _no_get: bool,
    ) -> RemoteResult<Vec<GetOperation>> {
        let mut state = self.record("get");
        state.get_requests.extend_from_slice(requests);
        Ok(state.get_operations.clone())
    }

    fn check_in(
        &self,
        _workspace: &WorkspaceId,
        server_paths: &[String],
        comment: &str,
        _work_items: &[WorkItemLink],
    ) -> RemoteResult<CheckInResult> {
        let mut state = self.record("check_in");
        if let Some(err) = state.fail_check_in.clone() {
            return Err(err);
        }
        state.checked_in.extend_from_slice(server_paths);
        state.check_in_comments.push(comment.to_string());
        Ok(state.check_in_result.clone().unwrap_or(CheckInResult {
            changeset: 1,
            failures: Vec::new(),
        }))
    }

    fn query_conflicts(
        &self,
        _workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<Conflict>> {
        let state = self.record("query_conflicts");
        Ok(state
            .conflicts
            .iter()
            .filter(|c| specs.iter().any(|s| s.matches(&c.your_server_path)))
            .cloned()
            .collect())
    }

    fn resolve(
        &self,
        _workspace: &WorkspaceId,
        conflict_id: i32,
        resolution: Resolution,
    ) -> RemoteResult<ResolveOutcome> {
        let mut state = self.record("resolve");
        state.resolved.push((conflict_id, resolution));
        Ok(state.resolve_outcome.clone())
    }

    fn update_local_version(
        &self,
        _workspace: &WorkspaceId,
        updates: &[UpdateLocalVersion],
    ) -> RemoteResult<()> {
        let mut state = self.record("update_local_version");
        let call = state.call_count("update_local_version") - 1;
        if state.fail_version_update_call == Some(call) {
            return Err(RemoteError::network("connection reset"));
        }
        state.version_updates.push(updates.to_vec());
        Ok(())
    }

    fn download_to_temp(&self, artifact_uri: &str) -> RemoteResult<PathBuf> {
        let state = self.record("download_to_temp");
        let content = state.artifacts.get(artifact_uri).ok_or_else(|| {
            RemoteError::network(format!("download of {artifact_uri} failed"))
        })?;
        let name = format!("dl-{}.tmp", state.call_count("download_to_temp"));
        let path = self.download_dir.join(name);
        std::fs::write(&path, content).map_err(|e| RemoteError::network(e.to_string()))?;
        Ok(path)
    }

    fn upload_file(
        &self,
        _workspace: &WorkspaceId,
        server_path: &str,
        content: &[u8],
    ) -> RemoteResult<()> {
        let mut state = self.record("upload_file");
        state.uploads.push((server_path.to_string(), content.to_vec()));
        Ok(())
    }

    fn update_workspace(&self, info: &WorkspaceInfo) -> RemoteResult<WorkspaceInfo> {
        let mut state = self.record("update_workspace");
        state.workspace_updates.push(info.clone());
        Ok(info.clone())
    }
}

pub fn workspace_id() -> WorkspaceId {
    WorkspaceId::new("ws", "alice")
}

/// A get operation that fetches a file at `server_version`.
pub fn get_file(item_id: i32, target: &Path, uri: &str, server_version: i32) -> GetOperation {
    GetOperation {
        item_id,
        change_type: ChangeType::NONE,
        item_type: ItemType::File,
        source_local_path: None,
        target_local_path: Some(target.to_path_buf()),
        source_server_path: None,
        target_server_path: format!("$/P/{item_id}"),
        server_version,
        deletion_id: 0,
        artifact_uri: Some(uri.to_string()),
        content_hash: None,
    }
}

/// A get operation for `change_type` on a file with no download.
pub fn op(
    item_id: i32,
    change_type: ChangeType,
    source: Option<&Path>,
    target: Option<&Path>,
) -> GetOperation {
    GetOperation {
        item_id,
        change_type,
        item_type: ItemType::File,
        source_local_path: source.map(Path::to_path_buf),
        target_local_path: target.map(Path::to_path_buf),
        source_server_path: None,
        target_server_path: format!("$/P/{item_id}"),
        server_version: 5,
        deletion_id: 0,
        artifact_uri: None,
        content_hash: None,
    }
}

pub fn extended(server_path: &str, version_latest: i32) -> ExtendedItem {
    ExtendedItem {
        server_path: server_path.to_string(),
        local_path: None,
        item_type: ItemType::File,
        change_type: ChangeType::NONE,
        is_locked: false,
        lock_owner: None,
        has_other_pending_change: false,
        version_local: 0,
        version_latest,
        deletion_id: 0,
        source_server_path: None,
    }
}

pub fn conflict(conflict_id: i32, your_server_path: &str, target: &Path) -> Conflict {
    Conflict {
        conflict_id,
        item_id: conflict_id * 10,
        conflict_type: ConflictType::Get,
        target_local_path: Some(target.to_path_buf()),
        your_server_path: your_server_path.to_string(),
        their_server_path: your_server_path.to_string(),
        base_version: 1,
        their_version: 3,
        your_version: 2,
        base_download_uri: None,
        their_download_uri: Some(format!("uri:{conflict_id}")),
    }
}
