// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed cache of extended item metadata.
//!
//! Single-item lookups are served from the cache when possible; recursive
//! lookups always go to the server and refresh what they return. One mutex
//! guards the connection, so a check-fetch-insert sequence is atomic with
//! respect to other callers.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::item::{ChangeType, ExtendedItem, ItemSpec, RecursionType};
use crate::mapping::WorkspaceId;
use crate::path;
use crate::remote::RemoteStore;

/// SQL schema for the item cache.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS extended_items (
    workspace TEXT NOT NULL,
    server_path TEXT NOT NULL COLLATE NOCASE,
    local_path TEXT,
    item_type TEXT NOT NULL,
    change_type INTEGER NOT NULL DEFAULT 0,
    is_locked INTEGER NOT NULL DEFAULT 0,
    lock_owner TEXT,
    has_other_pending_change INTEGER NOT NULL DEFAULT 0,
    version_local INTEGER NOT NULL DEFAULT 0,
    version_latest INTEGER NOT NULL DEFAULT 0,
    deletion_id INTEGER NOT NULL DEFAULT 0,
    source_server_path TEXT,
    cached_at TEXT NOT NULL,
    PRIMARY KEY (workspace, server_path)
);
"#;

const COLUMNS: &str = "server_path, local_path, item_type, change_type, is_locked, lock_owner, \
     has_other_pending_change, version_local, version_latest, deletion_id, source_server_path";

/// Parse a text column, returning a rusqlite error on failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

fn item_from_row(row: &Row<'_>) -> std::result::Result<ExtendedItem, rusqlite::Error> {
    let item_type: String = row.get(2)?;
    let local_path: Option<String> = row.get(1)?;
    Ok(ExtendedItem {
        server_path: row.get(0)?,
        local_path: local_path.map(PathBuf::from),
        item_type: parse_db(&item_type, "item_type")?,
        change_type: ChangeType::from_bits(row.get(3)?),
        is_locked: row.get(4)?,
        lock_owner: row.get(5)?,
        has_other_pending_change: row.get(6)?,
        version_local: row.get(7)?,
        version_latest: row.get(8)?,
        deletion_id: row.get(9)?,
        source_server_path: row.get(10)?,
    })
}

/// Cache of [`ExtendedItem`] rows keyed by workspace and server path.
pub struct WorkspaceCache {
    conn: Mutex<Connection>,
    remote: Arc<dyn RemoteStore>,
}

impl WorkspaceCache {
    /// Opens a cache that lives only as long as this value.
    pub fn in_memory(remote: Arc<dyn RemoteStore>) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, remote)
    }

    /// Opens or creates an on-disk cache.
    pub fn open(path: &Path, remote: Arc<dyn RemoteStore>) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::with_connection(conn, remote)
    }

    fn with_connection(conn: Connection, remote: Arc<dyn RemoteStore>) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(WorkspaceCache {
            conn: Mutex::new(conn),
            remote,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns metadata for `paths`.
    ///
    /// With [`RecursionType::None`] cached rows are returned as they are and
    /// only misses are fetched. Deeper recursion always queries the server
    /// and stores everything it returns.
    pub fn get_items(
        &self,
        workspace: &WorkspaceId,
        paths: &[String],
        recursion: RecursionType,
    ) -> Result<Vec<ExtendedItem>> {
        let paths = &canonical(paths);
        let conn = self.lock();

        if recursion != RecursionType::None {
            let specs: Vec<ItemSpec> = paths
                .iter()
                .map(|p| ItemSpec::new(p.clone(), recursion))
                .collect();
            let fetched = self.remote.query_items_extended(workspace, &specs)?;
            store(&conn, workspace, &fetched)?;
            return Ok(fetched);
        }

        let mut found: Vec<Option<ExtendedItem>> = Vec::with_capacity(paths.len());
        let mut misses = Vec::new();
        for path in paths {
            let hit = lookup(&conn, workspace, path)?;
            if hit.is_none() {
                misses.push(ItemSpec::single(path.clone()));
            }
            found.push(hit);
        }
        tracing::debug!(
            workspace = %workspace,
            hits = paths.len() - misses.len(),
            misses = misses.len(),
            "item cache lookup"
        );

        let fetched = if misses.is_empty() {
            Vec::new()
        } else {
            let fetched = self.remote.query_items_extended(workspace, &misses)?;
            store(&conn, workspace, &fetched)?;
            fetched
        };

        Ok(paths
            .iter()
            .zip(found)
            .filter_map(|(path, hit)| {
                hit.or_else(|| {
                    fetched
                        .iter()
                        .find(|item| {
                            path::server_eq(&path::canonical_server(&item.server_path), path)
                        })
                        .cloned()
                })
            })
            .collect())
    }

    /// Re-fetches one item, bypassing cached rows.
    pub fn refresh_item(
        &self,
        workspace: &WorkspaceId,
        path: &str,
    ) -> Result<Option<ExtendedItem>> {
        Ok(self
            .refresh_items(workspace, &[path.to_string()])?
            .into_iter()
            .next())
    }

    /// Re-fetches items, bypassing cached rows. Paths the server no longer
    /// reports are evicted.
    pub fn refresh_items(
        &self,
        workspace: &WorkspaceId,
        paths: &[String],
    ) -> Result<Vec<ExtendedItem>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        let paths = &canonical(paths);
        let conn = self.lock();
        let specs: Vec<ItemSpec> = paths.iter().map(|p| ItemSpec::single(p.clone())).collect();
        let fetched = self.remote.query_items_extended(workspace, &specs)?;

        let gone: Vec<String> = paths
            .iter()
            .filter(|p| {
                !fetched
                    .iter()
                    .any(|i| path::server_eq(&path::canonical_server(&i.server_path), p))
            })
            .cloned()
            .collect();
        evict(&conn, workspace, &gone)?;
        store(&conn, workspace, &fetched)?;
        tracing::debug!(
            workspace = %workspace,
            refreshed = fetched.len(),
            evicted = gone.len(),
            "item cache refresh"
        );
        Ok(fetched)
    }

    /// Returns the cached row for `path` without contacting the server.
    pub fn cached(&self, workspace: &WorkspaceId, path: &str) -> Result<Option<ExtendedItem>> {
        lookup(&self.lock(), workspace, &path::canonical_server(path))
    }

    /// Drops cached rows for `paths`; returns how many were removed.
    pub fn invalidate(&self, workspace: &WorkspaceId, paths: &[String]) -> Result<usize> {
        evict(&self.lock(), workspace, &canonical(paths))
    }

    /// Drops every cached row of a workspace.
    pub fn clear(&self, workspace: &WorkspaceId) -> Result<usize> {
        let removed = self.lock().execute(
            "DELETE FROM extended_items WHERE workspace = ?1",
            params![workspace.to_string()],
        )?;
        Ok(removed)
    }

    /// Number of cached rows for a workspace.
    pub fn len(&self, workspace: &WorkspaceId) -> Result<usize> {
        let count: i64 = self.lock().query_row(
            "SELECT COUNT(*) FROM extended_items WHERE workspace = ?1",
            params![workspace.to_string()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn lookup(
    conn: &Connection,
    workspace: &WorkspaceId,
    path: &str,
) -> Result<Option<ExtendedItem>> {
    let sql =
        format!("SELECT {COLUMNS} FROM extended_items WHERE workspace = ?1 AND server_path = ?2");
    let item = conn
        .query_row(&sql, params![workspace.to_string(), path], item_from_row)
        .optional()?;
    Ok(item)
}

fn store(conn: &Connection, workspace: &WorkspaceId, items: &[ExtendedItem]) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let mut stmt = conn.prepare_cached(
        "INSERT OR REPLACE INTO extended_items (workspace, server_path, local_path, item_type, \
         change_type, is_locked, lock_owner, has_other_pending_change, version_local, \
         version_latest, deletion_id, source_server_path, cached_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?;
    for item in items {
        stmt.execute(params![
            workspace.to_string(),
            path::canonical_server(&item.server_path).into_owned(),
            item.local_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            item.item_type.as_str(),
            item.change_type.bits(),
            item.is_locked,
            item.lock_owner,
            item.has_other_pending_change,
            item.version_local,
            item.version_latest,
            item.deletion_id,
            item.source_server_path,
            now,
        ])?;
    }
    Ok(())
}

/// Server paths in the form rows are keyed by.
fn canonical(paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|p| path::canonical_server(p).into_owned())
        .collect()
}

fn evict(conn: &Connection, workspace: &WorkspaceId, paths: &[String]) -> Result<usize> {
    let mut removed = 0;
    for path in paths {
        removed += conn.execute(
            "DELETE FROM extended_items WHERE workspace = ?1 AND server_path = ?2",
            params![workspace.to_string(), path],
        )?;
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
