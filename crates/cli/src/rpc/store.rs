// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! [`RemoteStore`] over the RPC client.
//!
//! The engine is synchronous, so each call blocks on a private
//! current-thread runtime for one round trip. Calls are serialized on the
//! single connection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tfsync_core::{
    ChangeRequest, CheckInResult, Conflict, ExtendedItem, GetOperation, GetRequest, Item,
    ItemSpec, PendOutcome, PendingChange, RemoteError, RemoteResult, RemoteStore, Resolution,
    ResolveOutcome, UpdateLocalVersion, VersionSpec, WorkItemLink, WorkspaceId, WorkspaceInfo,
};
use tokio::runtime::Runtime;

use super::client::RpcClient;
use super::transport::{Transport, WebSocketTransport};

/// Parameters of every call scoped by item specs.
#[derive(Serialize)]
struct Scoped<'a> {
    workspace: &'a WorkspaceId,
    specs: &'a [ItemSpec],
}

#[derive(Serialize)]
struct QueryItems<'a> {
    workspace: &'a WorkspaceId,
    specs: &'a [ItemSpec],
    version: VersionSpec,
}

#[derive(Serialize)]
struct PendChanges<'a> {
    workspace: &'a WorkspaceId,
    changes: &'a [ChangeRequest],
}

#[derive(Serialize)]
struct Get<'a> {
    workspace: &'a WorkspaceId,
    requests: &'a [GetRequest],
    force: bool,
    no_get: bool,
}

#[derive(Serialize)]
struct CheckIn<'a> {
    workspace: &'a WorkspaceId,
    server_paths: &'a [String],
    comment: &'a str,
    work_items: &'a [WorkItemLink],
}

#[derive(Serialize)]
struct Resolve<'a> {
    workspace: &'a WorkspaceId,
    conflict_id: i32,
    resolution: Resolution,
}

#[derive(Serialize)]
struct UpdateLocalVersions<'a> {
    workspace: &'a WorkspaceId,
    updates: &'a [UpdateLocalVersion],
}

#[derive(Serialize)]
struct Download<'a> {
    artifact_uri: &'a str,
}

/// Artifact bytes, hex encoded.
#[derive(Deserialize)]
struct DownloadResult {
    content: String,
}

#[derive(Serialize)]
struct Upload<'a> {
    workspace: &'a WorkspaceId,
    server_path: &'a str,
    /// Hex encoded bytes.
    content: String,
    /// SHA-256 of the bytes, hex encoded.
    content_hash: String,
}

#[derive(Serialize)]
struct UpdateWorkspace<'a> {
    workspace: &'a WorkspaceInfo,
}

/// Remote store backed by an [`RpcClient`].
pub struct RpcRemoteStore<T: Transport = WebSocketTransport> {
    runtime: Runtime,
    client: Mutex<RpcClient<T>>,
    download_dir: PathBuf,
}

impl<T: Transport> RpcRemoteStore<T> {
    /// Wraps `client`; downloads are written below `download_dir`.
    pub fn new(client: RpcClient<T>, download_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(RpcRemoteStore {
            runtime,
            client: Mutex::new(client),
            download_dir: download_dir.into(),
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn client(&self) -> MutexGuard<'_, RpcClient<T>> {
        self.client.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn call<P, R>(&self, method: &str, params: &P) -> RemoteResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let mut client = self.client();
        self.runtime.block_on(client.invoke(method, params))
    }

    /// Closes the connection, if open.
    pub fn disconnect(&self) -> RemoteResult<()> {
        let mut client = self.client();
        self.runtime.block_on(client.disconnect())
    }
}

/// File name a download is stored under.
pub fn download_file_name(artifact_uri: &str) -> String {
    hex::encode(Sha256::digest(artifact_uri.as_bytes()))
}

impl<T: Transport> RemoteStore for RpcRemoteStore<T> {
    fn query_items(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
        version: VersionSpec,
    ) -> RemoteResult<Vec<Item>> {
        self.call(
            "query_items",
            &QueryItems {
                workspace,
                specs,
                version,
            },
        )
    }

    fn query_items_extended(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<ExtendedItem>> {
        self.call("query_items_extended", &Scoped { workspace, specs })
    }

    fn query_pending_changes(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<PendingChange>> {
        self.call("query_pending_changes", &Scoped { workspace, specs })
    }

    fn pend_changes(
        &self,
        workspace: &WorkspaceId,
        changes: &[ChangeRequest],
    ) -> RemoteResult<PendOutcome> {
        self.call("pend_changes", &PendChanges { workspace, changes })
    }

    fn undo_pending_changes(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<PendOutcome> {
        self.call("undo_pending_changes", &Scoped { workspace, specs })
    }

    fn get(
        &self,
        workspace: &WorkspaceId,
        requests: &[GetRequest],
        force: bool,
        no_get: bool,
    ) -> RemoteResult<Vec<GetOperation>> {
        self.call(
            "get",
            &Get {
                workspace,
                requests,
                force,
                no_get,
            },
        )
    }

    fn check_in(
        &self,
        workspace: &WorkspaceId,
        server_paths: &[String],
        comment: &str,
        work_items: &[WorkItemLink],
    ) -> RemoteResult<CheckInResult> {
        self.call(
            "check_in",
            &CheckIn {
                workspace,
                server_paths,
                comment,
                work_items,
            },
        )
    }

    fn query_conflicts(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<Conflict>> {
        self.call("query_conflicts", &Scoped { workspace, specs })
    }

    fn resolve(
        &self,
        workspace: &WorkspaceId,
        conflict_id: i32,
        resolution: Resolution,
    ) -> RemoteResult<ResolveOutcome> {
        self.call(
            "resolve",
            &Resolve {
                workspace,
                conflict_id,
                resolution,
            },
        )
    }

    fn update_local_version(
        &self,
        workspace: &WorkspaceId,
        updates: &[UpdateLocalVersion],
    ) -> RemoteResult<()> {
        self.call("update_local_version", &UpdateLocalVersions { workspace, updates })
    }

    fn download_to_temp(&self, artifact_uri: &str) -> RemoteResult<PathBuf> {
        let result: DownloadResult = self.call("download", &Download { artifact_uri })?;
        let content = hex::decode(&result.content)
            .map_err(|e| RemoteError::malformed(format!("download content is not hex: {e}")))?;

        let local_io = |e: std::io::Error| {
            RemoteError::network(format!(
                "could not store download in {}: {e}",
                self.download_dir.display()
            ))
        };
        fs::create_dir_all(&self.download_dir).map_err(local_io)?;
        let path = self.download_dir.join(download_file_name(artifact_uri));
        fs::write(&path, &content).map_err(local_io)?;
        tracing::debug!(uri = artifact_uri, path = %path.display(), bytes = content.len(), "downloaded");
        Ok(path)
    }

    fn upload_file(
        &self,
        workspace: &WorkspaceId,
        server_path: &str,
        content: &[u8],
    ) -> RemoteResult<()> {
        self.call(
            "upload_file",
            &Upload {
                workspace,
                server_path,
                content: hex::encode(content),
                content_hash: hex::encode(Sha256::digest(content)),
            },
        )
    }

    fn update_workspace(&self, info: &WorkspaceInfo) -> RemoteResult<WorkspaceInfo> {
        self.call("update_workspace", &UpdateWorkspace { workspace: info })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
