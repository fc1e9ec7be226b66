// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tfsync - the command line client for a version-control workspace.
//!
//! This crate provides the `tfs` CLI on top of [`tfsync_core`]. It owns
//! everything the engine leaves to its caller: the `.tfsync/` project
//! directory, the persisted workspace mappings, the JSON-RPC connection to
//! the server and the credential provider.
//!
//! # Main Components
//!
//! - [`Config`] - Project configuration (server endpoint, engine settings)
//! - [`Registry`] - Persisted workspace name, owner and working folders
//! - [`Project`] - An opened project that can attach its workspace
//! - [`rpc`] - WebSocket JSON-RPC client implementing the remote store
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use tfsync::{init_work_dir, Config, Project};
//! use tfsync_core::WorkspaceInfo;
//!
//! // Initialize a new project
//! let info = WorkspaceInfo::new("dev", "alice");
//! let work_dir = init_work_dir(Path::new("."), &Config::default(), &info)?;
//!
//! // Later, find the project and attach its workspace
//! let project = Project::find()?;
//! let workspace = project.connect()?;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod project;
pub mod registry;
pub mod rpc;

pub use cli::{
    Cli, Command, OutputArgs, OutputFormat, QueryCommand, ScopeArgs, WorkfoldCommand,
};
pub use config::{find_work_dir, init_work_dir, Config, ServerConfig};
pub use credentials::EnvTokenProvider;
pub use error::{Error, Result};
pub use project::Project;
pub use registry::Registry;

/// Runs one parsed command.
pub fn run(command: Command) -> Result<()> {
    match command {
        // Workspace
        Command::Init {
            name,
            owner,
            server,
            map,
            path,
        } => commands::init::run(name, owner, server, map, path),
        Command::Workfold(cmd) => commands::workfold::run(cmd),
        Command::ResolvePath { path } => commands::resolve_path::run(path),

        // Changes
        Command::Get {
            scope,
            version,
            force,
            no_get,
        } => commands::get::run(scope.paths, version, force, no_get),
        Command::Add { paths, recursive } => commands::changes::add(paths, recursive),
        Command::Edit { paths } => commands::changes::edit(paths),
        Command::Delete { paths } => commands::changes::delete(paths),
        Command::Rename { from, to } => commands::changes::rename(from, to),
        Command::Lock { paths, level } => commands::changes::lock(paths, level),
        Command::Undo { paths, recursive } => commands::changes::undo(paths, recursive),
        Command::Status { scope, output } => commands::status::run(scope.paths, output.output),
        Command::Checkin {
            scope,
            message,
            work_items,
            resolve,
        } => commands::checkin::run(scope.paths, message, work_items, resolve),

        // Conflicts
        Command::Conflicts { scope, output } => {
            commands::conflicts::list(scope.paths, output.output)
        }
        Command::Resolve {
            conflict_id,
            resolution,
        } => commands::conflicts::resolve(conflict_id, resolution),

        // Work items
        Command::Query(cmd) => commands::query::run(cmd),
    }
}

/// Log destination configured for the enclosing project, if any.
pub fn configured_log_path() -> Option<std::path::PathBuf> {
    let work_dir = find_work_dir().ok()?;
    let config = Config::load(&work_dir).ok()?;
    config.log_path(&work_dir)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
