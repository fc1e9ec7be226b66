// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory set of staged pending changes.

use std::sync::{Mutex, MutexGuard};

use crate::item::{ItemSpec, PendingChange};
use crate::path;

/// Tracks pending changes keyed by server path.
///
/// The set is transient; the server's list is authoritative and can be
/// pulled in with [`PendingChangeTracker::reconcile`].
#[derive(Debug, Default)]
pub struct PendingChangeTracker {
    changes: Mutex<Vec<PendingChange>>,
}

impl PendingChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingChange>> {
        // A poisoned lock still holds a consistent list
        self.changes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stages a change, overwriting any entry for the same server path.
    pub fn stage(&self, change: PendingChange) {
        let mut changes = self.lock();
        match changes
            .iter_mut()
            .find(|c| path::server_eq(&c.server_path, &change.server_path))
        {
            Some(existing) => *existing = change,
            None => changes.push(change),
        }
    }

    /// Changes inside `scope`, in staging order.
    pub fn changes(&self, scope: &ItemSpec) -> Vec<PendingChange> {
        self.lock()
            .iter()
            .filter(|c| scope.matches(&c.server_path))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<PendingChange> {
        self.lock().clone()
    }

    pub fn get(&self, server_path: &str) -> Option<PendingChange> {
        self.lock()
            .iter()
            .find(|c| path::server_eq(&c.server_path, server_path))
            .cloned()
    }

    /// Drops the entries for the given server paths; returns how many went.
    pub fn remove(&self, server_paths: &[String]) -> usize {
        let mut changes = self.lock();
        let before = changes.len();
        changes.retain(|c| !server_paths.iter().any(|p| path::server_eq(p, &c.server_path)));
        before - changes.len()
    }

    /// Replaces the whole set with the server's authoritative list.
    pub fn reconcile(&self, server_set: Vec<PendingChange>) {
        let mut changes = self.lock();
        changes.clear();
        for change in server_set {
            match changes
                .iter_mut()
                .find(|c| path::server_eq(&c.server_path, &change.server_path))
            {
                Some(existing) => *existing = change,
                None => changes.push(change),
            }
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
