// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tfsync-core operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::remote::RemoteError;

/// All possible errors that can occur in tfsync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid working folder mapping: {0}")]
    Configuration(String),

    #[error("invalid server path: '{0}'\n  hint: server paths are rooted at '$/', e.g. $/Project/src")]
    InvalidServerPath(String),

    #[error("no working folder mapping for '{0}'\n  hint: map a parent folder with 'tfs workfold map'")]
    NotMapped(String),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("local io error at {}: {source}", path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("query syntax error at offset {offset}: {message}")]
    QuerySyntax { offset: usize, message: String },

    #[error("invalid node order: {0}")]
    InvalidNodeOrder(String),

    #[error("unknown query parameter '@{0}'")]
    UnknownParameter(String),

    #[error("conflict {0} is not in the active conflict set\n  hint: run a conflict query first")]
    ConflictNotActive(i32),

    #[error("invalid change type: '{0}'")]
    InvalidChangeType(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Wraps an I/O error with the path it occurred at.
    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::LocalIo {
            path: path.into(),
            source,
        }
    }
}

/// A specialized Result type for tfsync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
