// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tfsync-core: workspace synchronization engine
//!
//! This crate reconciles a local working copy with a server-side versioned
//! tree. It maps paths between the two sides, stages pending changes,
//! applies server-issued get operations to disk, writes local versions
//! back to the server and caches item metadata. A small WHERE-clause
//! engine turns work-item queries into structured query XML.
//!
//! The network and the disk sit behind the [`RemoteStore`] and
//! [`Filesystem`] traits; [`Workspace`] wires everything together.

pub mod cache;
pub mod cancel;
pub mod config;
pub mod conflict;
pub mod error;
pub mod fs;
pub mod identity;
pub mod item;
pub mod journal;
pub mod mapping;
pub mod operation;
pub mod path;
pub mod pending;
pub mod processor;
pub mod query;
pub mod remote;
pub mod workspace;
pub mod writeback;

#[cfg(test)]
mod test_helpers;

pub use cache::WorkspaceCache;
pub use cancel::CancellationToken;
pub use config::EngineConfig;
pub use conflict::{ConflictResolver, ResolveReport};
pub use error::{Error, Result};
pub use fs::{Filesystem, LocalEntry, LocalFilesystem};
pub use item::{
    ChangeRequest, ChangeType, CheckInResult, Conflict, ConflictType, ExtendedItem, Failure,
    GetRequest, Item, ItemSpec, ItemType, LockLevel, PendingChange, RecursionType, Resolution,
    Severity, VersionSpec, WorkItemLink,
};
pub use journal::Journal;
pub use mapping::{PathMapper, WorkingFolder, WorkingFolderType, WorkspaceId, WorkspaceInfo};
pub use operation::{Direction, GetAction, GetOperation, UpdateLocalVersion};
pub use pending::PendingChangeTracker;
pub use processor::{GetOperationProcessor, LocalFailure, ProcessOptions, ProcessReport};
pub use query::{NodeList, QueryParameters, WorkItemQuery};
pub use remote::{
    CredentialProvider, PendOutcome, RemoteError, RemoteErrorKind, RemoteResult, RemoteStore,
    ResolveOutcome,
};
pub use workspace::{PendReport, Workspace};
pub use writeback::LocalVersionWriteBack;
