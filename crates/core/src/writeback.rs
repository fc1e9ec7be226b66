// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue of local-version updates awaiting write-back to the server.
//!
//! Updates are queued in processing order and sent in one call per flush,
//! or in ordered chunks when a chunk size is configured. With a journal the
//! queue is mirrored to a [`Journal`] so a crash between apply and flush
//! loses nothing; [`LocalVersionWriteBack::recover`] reloads it.

use std::path::Path;

use crate::error::Result;
use crate::journal::Journal;
use crate::mapping::WorkspaceId;
use crate::operation::UpdateLocalVersion;
use crate::remote::RemoteStore;

/// Ordered queue of [`UpdateLocalVersion`] records for one workspace.
#[derive(Debug)]
pub struct LocalVersionWriteBack {
    workspace: WorkspaceId,
    queue: Vec<UpdateLocalVersion>,
    chunk_size: Option<usize>,
    journal: Option<Journal>,
}

impl LocalVersionWriteBack {
    pub fn new(workspace: WorkspaceId) -> Self {
        LocalVersionWriteBack {
            workspace,
            queue: Vec::new(),
            chunk_size: None,
            journal: None,
        }
    }

    /// Splits flushes into calls of at most `size` updates. Zero means no limit.
    pub fn with_chunk_size(mut self, size: Option<usize>) -> Self {
        self.chunk_size = size.filter(|s| *s > 0);
        self
    }

    /// Mirrors the queue to a journal at `path`.
    pub fn with_journal(mut self, path: &Path) -> Self {
        self.journal = Some(Journal::new(path));
        self
    }

    /// Reloads a queue left behind in a journal by an interrupted batch.
    pub fn recover(workspace: WorkspaceId, path: &Path) -> Result<Self> {
        let journal = Journal::new(path);
        let queue = journal.repair()?;
        if !queue.is_empty() {
            tracing::info!(
                workspace = %workspace,
                count = queue.len(),
                "recovered unflushed local version updates"
            );
        }
        Ok(LocalVersionWriteBack {
            workspace,
            queue,
            chunk_size: None,
            journal: Some(journal),
        })
    }

    /// Appends an update. Duplicates for the same item are kept.
    ///
    /// The update is queued even when the journal append fails; the error
    /// only means it would not survive a crash before the next flush.
    pub fn queue_update(&mut self, update: UpdateLocalVersion) -> Result<()> {
        let appended = match &self.journal {
            Some(journal) => journal.append(&update),
            None => Ok(()),
        };
        self.queue.push(update);
        appended
    }

    pub fn workspace(&self) -> &WorkspaceId {
        &self.workspace
    }

    pub fn pending(&self) -> &[UpdateLocalVersion] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Sends every queued update and clears the queue.
    ///
    /// On a failed chunk the chunks already acknowledged are dropped, the
    /// rest stays queued and the error is returned. Returns the number of
    /// updates sent.
    pub fn flush(&mut self, remote: &dyn RemoteStore) -> Result<usize> {
        if self.queue.is_empty() {
            return Ok(0);
        }
        let chunk = self.chunk_size.unwrap_or(self.queue.len());
        let mut sent = 0;
        let mut failure = None;

        for batch in self.queue.chunks(chunk) {
            match remote.update_local_version(&self.workspace, batch) {
                Ok(()) => sent += batch.len(),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        let total = self.queue.len();
        self.remove_first(sent)?;
        if let Some(e) = failure {
            tracing::warn!(
                workspace = %self.workspace,
                sent,
                remaining = total - sent,
                error = %e,
                "local version write-back failed"
            );
            return Err(e.into());
        }

        tracing::debug!(workspace = %self.workspace, sent, "flushed local version updates");
        Ok(sent)
    }

    /// Drops the first `count` updates from the queue and the journal.
    fn remove_first(&mut self, count: usize) -> Result<()> {
        self.queue.drain(..count.min(self.queue.len()));
        if let Some(journal) = &self.journal {
            journal.replace(&self.queue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "writeback_tests.rs"]
mod tests;
