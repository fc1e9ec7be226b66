// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the `tfs` client.
///
/// Engine failures keep the core message; the client adds hints where a
/// user can act on them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'tfs init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("no server configured\n  hint: set 'url' in the [server] section of .tfsync/config.toml")]
    NoServer,

    #[error("config error: {0}")]
    Config(String),

    #[error("workspace registry error: {0}")]
    Registry(String),

    #[error("{0}")]
    Engine(tfsync_core::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{failed} item(s) failed\n  hint: see the messages above; rerun the command once they are fixed")]
    PartialFailure { failed: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tfsync client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<tfsync_core::Error> for Error {
    fn from(e: tfsync_core::Error) -> Self {
        match e {
            tfsync_core::Error::Io(e) => Error::Io(e),
            tfsync_core::Error::Json(e) => Error::Json(e),
            tfsync_core::Error::InvalidInput(s) => Error::InvalidInput(s),
            other => Error::Engine(other),
        }
    }
}

impl From<tfsync_core::RemoteError> for Error {
    fn from(e: tfsync_core::RemoteError) -> Self {
        Error::Engine(tfsync_core::Error::Remote(e))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
