// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator seams towards the server.
//!
//! [`RemoteStore`] is the protocol facade the engine talks to. Every call
//! either returns a structured result or a [`RemoteError`] carrying a
//! machine-readable code. Implementations are expected to be cheap to share
//! behind an `Arc` and to block the caller for the duration of one round
//! trip.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::item::{
    ChangeRequest, CheckInResult, Conflict, ExtendedItem, Failure, GetRequest, Item, ItemSpec,
    PendingChange, Resolution, VersionSpec, WorkItemLink,
};
use crate::mapping::{WorkspaceId, WorkspaceInfo};
use crate::operation::{GetOperation, UpdateLocalVersion};

/// Broad category of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    /// The server could not be reached or the connection dropped.
    Network,
    /// The server rejected the call.
    Fault,
    /// The response could not be understood.
    MalformedResponse,
    /// Credentials were missing or refused.
    Unauthorized,
    /// Unresolved conflicts block the requested operation.
    ConflictUnresolved,
}

impl RemoteErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteErrorKind::Network => "network",
            RemoteErrorKind::Fault => "fault",
            RemoteErrorKind::MalformedResponse => "malformed_response",
            RemoteErrorKind::Unauthorized => "unauthorized",
            RemoteErrorKind::ConflictUnresolved => "conflict_unresolved",
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Any failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} [{kind}: {code}]")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    /// Machine-readable failure code reported by the server.
    pub code: String,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        RemoteError {
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Network, "NetworkError", message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::MalformedResponse, "MalformedResponse", message)
    }

    pub fn is_conflict_unresolved(&self) -> bool {
        self.kind == RemoteErrorKind::ConflictUnresolved
    }
}

/// Result type for remote calls.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Operations and soft failures returned by pend/undo calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendOutcome {
    #[serde(default)]
    pub operations: Vec<GetOperation>,
    #[serde(default)]
    pub failures: Vec<Failure>,
}

/// Operations returned by a conflict resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOutcome {
    /// Applied in the normal direction.
    #[serde(default)]
    pub get_operations: Vec<GetOperation>,
    /// Applied in the undo direction.
    #[serde(default)]
    pub undo_operations: Vec<GetOperation>,
}

/// Network/protocol facade offered by the server.
pub trait RemoteStore: Send + Sync {
    fn query_items(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
        version: VersionSpec,
    ) -> RemoteResult<Vec<Item>>;

    fn query_items_extended(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<ExtendedItem>>;

    fn query_pending_changes(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<PendingChange>>;

    fn pend_changes(
        &self,
        workspace: &WorkspaceId,
        changes: &[ChangeRequest],
    ) -> RemoteResult<PendOutcome>;

    fn undo_pending_changes(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<PendOutcome>;

    fn get(
        &self,
        workspace: &WorkspaceId,
        requests: &[GetRequest],
        force: bool,
        no_get: bool,
    ) -> RemoteResult<Vec<GetOperation>>;

    fn check_in(
        &self,
        workspace: &WorkspaceId,
        server_paths: &[String],
        comment: &str,
        work_items: &[WorkItemLink],
    ) -> RemoteResult<CheckInResult>;

    fn query_conflicts(
        &self,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> RemoteResult<Vec<Conflict>>;

    fn resolve(
        &self,
        workspace: &WorkspaceId,
        conflict_id: i32,
        resolution: Resolution,
    ) -> RemoteResult<ResolveOutcome>;

    fn update_local_version(
        &self,
        workspace: &WorkspaceId,
        updates: &[UpdateLocalVersion],
    ) -> RemoteResult<()>;

    /// Downloads an artifact and returns the path of a temporary local copy.
    fn download_to_temp(&self, artifact_uri: &str) -> RemoteResult<PathBuf>;

    fn upload_file(
        &self,
        workspace: &WorkspaceId,
        server_path: &str,
        content: &[u8],
    ) -> RemoteResult<()>;

    fn update_workspace(&self, info: &WorkspaceInfo) -> RemoteResult<WorkspaceInfo>;
}

/// Supplies an authorization value for each request.
///
/// Refreshing expired tokens is the provider's business.
pub trait CredentialProvider: Send + Sync {
    fn authorization(&self) -> RemoteResult<String>;
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
