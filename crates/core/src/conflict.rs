// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Active conflict set and resolution replay.

use std::sync::{Mutex, MutexGuard};

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::item::{Conflict, ItemSpec, Resolution};
use crate::mapping::WorkspaceId;
use crate::operation::Direction;
use crate::processor::{GetOperationProcessor, ProcessOptions, ProcessReport};
use crate::writeback::LocalVersionWriteBack;

/// What happened locally while resolving one conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    pub conflict_id: i32,
    pub resolution: Resolution,
    /// Result of replaying the server's get operations.
    pub get: ProcessReport,
    /// Result of replaying the server's undo operations.
    pub undo: ProcessReport,
}

impl ResolveReport {
    pub fn is_clean(&self) -> bool {
        self.get.is_clean() && self.undo.is_clean()
    }
}

/// Holds the conflicts found by the last query and settles them one by one.
#[derive(Debug, Default)]
pub struct ConflictResolver {
    active: Mutex<Vec<Conflict>>,
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Conflict>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Asks the server for conflicts in `specs` and makes them the active set.
    pub fn query(
        &self,
        processor: &GetOperationProcessor<'_>,
        workspace: &WorkspaceId,
        specs: &[ItemSpec],
    ) -> Result<Vec<Conflict>> {
        let found = processor.remote().query_conflicts(workspace, specs)?;
        tracing::info!(workspace = %workspace, count = found.len(), "queried conflicts");
        *self.lock() = found.clone();
        Ok(found)
    }

    pub fn active(&self) -> Vec<Conflict> {
        self.lock().clone()
    }

    pub fn get(&self, conflict_id: i32) -> Option<Conflict> {
        self.lock()
            .iter()
            .find(|c| c.conflict_id == conflict_id)
            .cloned()
    }

    /// Settles an active conflict and replays the resulting operations.
    ///
    /// Get operations run in the normal direction, undo operations in the
    /// undo direction. Only [`Resolution::AcceptTheirs`] downloads content.
    /// Once the server accepts the resolution the conflict leaves the
    /// active set, even if the local replay reports failures.
    pub fn resolve(
        &self,
        processor: &GetOperationProcessor<'_>,
        conflict_id: i32,
        resolution: Resolution,
        base: &ProcessOptions,
        writeback: &mut LocalVersionWriteBack,
        cancel: &CancellationToken,
    ) -> Result<ResolveReport> {
        if self.get(conflict_id).is_none() {
            return Err(Error::ConflictNotActive(conflict_id));
        }

        let outcome = processor
            .remote()
            .resolve(writeback.workspace(), conflict_id, resolution)?;
        self.lock().retain(|c| c.conflict_id != conflict_id);
        tracing::info!(
            conflict = conflict_id,
            ?resolution,
            gets = outcome.get_operations.len(),
            undos = outcome.undo_operations.len(),
            "conflict resolved"
        );

        let normal = ProcessOptions {
            direction: Direction::Normal,
            no_download: !resolution.downloads(),
            ..*base
        };
        let get = processor.process(&outcome.get_operations, &normal, writeback, cancel)?;

        let undo_options = ProcessOptions {
            direction: Direction::Undo,
            ..*base
        };
        let undo = processor.process(&outcome.undo_operations, &undo_options, writeback, cancel)?;

        Ok(ResolveReport {
            conflict_id,
            resolution,
            get,
            undo,
        })
    }
}

#[cfg(test)]
#[path = "conflict_tests.rs"]
mod tests;
