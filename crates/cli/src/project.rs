// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! An initialized project directory and the workspace attached to it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tfsync_core::{
    path, CancellationToken, ItemSpec, LocalFilesystem, PathMapper, Workspace, WorkspaceCache,
    WorkspaceInfo,
};

use crate::config::{cache_path, find_work_dir, Config};
use crate::credentials::EnvTokenProvider;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::rpc::{RpcClient, RpcConfig, RpcRemoteStore};

/// A `.tfsync/` directory with its configuration loaded.
#[derive(Debug, Clone)]
pub struct Project {
    work_dir: PathBuf,
    config: Config,
    registry: Registry,
}

impl Project {
    pub fn open(work_dir: PathBuf) -> Result<Self> {
        let config = Config::load(&work_dir)?;
        let registry = Registry::new(&work_dir);
        Ok(Project {
            work_dir,
            config,
            registry,
        })
    }

    /// Opens the project enclosing the current directory.
    pub fn find() -> Result<Self> {
        Self::open(find_work_dir()?)
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn info(&self) -> Result<WorkspaceInfo> {
        self.registry.load()
    }

    /// Path mapper over the persisted working folders.
    pub fn mapper(&self) -> Result<PathMapper> {
        Ok(PathMapper::from_folders(&self.info()?.folders)?)
    }

    /// Attaches the workspace to the configured server.
    ///
    /// Version updates left in the journal by an interrupted run are
    /// written back before this returns.
    pub fn connect(&self) -> Result<Workspace> {
        let info = self.info()?;
        let rpc = RpcConfig::from_server(&self.config.server)?;
        let mut client = RpcClient::new(rpc);
        if let Some(provider) = EnvTokenProvider::from_env(&self.config.server.token_env) {
            client = client.with_credentials(Arc::new(provider));
        }

        let download_dir = self.config.download_dir(&self.work_dir);
        let remote = Arc::new(RpcRemoteStore::new(client, download_dir)?);
        let cache = Arc::new(WorkspaceCache::open(&cache_path(&self.work_dir), remote.clone())?);

        tracing::debug!(workspace = %info.id(), "attaching workspace");
        let workspace = Workspace::attach(
            info,
            remote,
            Arc::new(LocalFilesystem::new()),
            cache,
            self.config.engine_config(&self.work_dir),
        )?;
        Ok(workspace)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Path arguments
// ─────────────────────────────────────────────────────────────────────────────

/// Resolves a command-line path against the current directory.
pub fn local_path(arg: &str) -> Result<PathBuf> {
    let candidate = Path::new(arg);
    if candidate.is_absolute() {
        return Ok(path::normalize_local(candidate));
    }
    let cwd = std::env::current_dir()?;
    Ok(path::normalize_local(&cwd.join(candidate)))
}

/// Resolves a local or server path argument to a server path.
pub fn server_path(mapper: &PathMapper, arg: &str) -> Result<String> {
    if path::is_server_path(arg) {
        return Ok(path::normalize_server(arg)?);
    }
    let local = local_path(arg)?;
    mapper
        .server_path_for(&local)
        .ok_or_else(|| tfsync_core::Error::NotMapped(local.display().to_string()).into())
}

/// Specs for the given arguments, or every mapped folder when empty.
pub fn scope_specs(mapper: &PathMapper, args: &[String]) -> Result<Vec<ItemSpec>> {
    if args.is_empty() {
        let specs: Vec<ItemSpec> = mapper
            .folders()
            .iter()
            .filter(|f| !f.is_cloaked())
            .map(|f| ItemSpec::full(f.server_path.clone()))
            .collect();
        if specs.is_empty() {
            return Err(Error::InvalidInput(
                "no working folders are mapped\n  hint: run 'tfs workfold map <server-path>'"
                    .to_string(),
            ));
        }
        return Ok(specs);
    }
    args.iter()
        .map(|arg| Ok(ItemSpec::full(server_path(mapper, arg)?)))
        .collect()
}

/// Local paths for arguments that must name mapped local items.
pub fn local_paths(args: &[String]) -> Result<Vec<PathBuf>> {
    args.iter().map(|arg| local_path(arg)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Cancellation
// ─────────────────────────────────────────────────────────────────────────────

/// Token cancelled when the user presses Ctrl-C.
///
/// The listener runs on its own thread and runtime; the workspace calls
/// stay synchronous.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let signalled = token.clone();
    let spawned = std::thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::warn!(error = %e, "no interrupt handler");
                    return;
                }
            };
            if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                tracing::warn!("interrupted, finishing the current item");
                signalled.cancel();
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "no interrupt handler");
    }
    token
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
