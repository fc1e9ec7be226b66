// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `.tfsync/config.toml` and includes:
//! - `log_file`: optional log destination (stderr when absent)
//! - `download_dir`: where downloaded artifacts land before being moved
//! - `[server]`: the RPC endpoint, credentials and retry policy
//! - `[engine]`: write-back chunking, journal and read-only gets
//!
//! A server URL is optional. Without one, only offline commands work.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tfsync_core::{EngineConfig, WorkspaceInfo};

use crate::error::{Error, Result};
use crate::registry::Registry;

const WORK_DIR_NAME: &str = ".tfsync";
const CONFIG_FILE_NAME: &str = "config.toml";
const CACHE_FILE_NAME: &str = "cache.db";
const JOURNAL_FILE_NAME: &str = "journal.jsonl";
const DOWNLOAD_DIR_NAME: &str = "downloads";

/// Client configuration stored in `.tfsync/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log destination, relative to the project root or absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Download directory for artifacts. Defaults to the user cache dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Server connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// WebSocket endpoint (`ws://...` or `wss://...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Environment variable holding the access token (default: TFSYNC_TOKEN).
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Connection attempts before giving up (default: 10).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First reconnect delay in milliseconds, doubled per attempt (default: 100).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Cap on the reconnect delay in seconds (default: 30).
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    /// Time to wait for one response in seconds (default: 60).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_token_env() -> String {
    "TFSYNC_TOKEN".to_string()
}

fn default_max_retries() -> u32 {
    10
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_max_delay_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            url: None,
            token_env: default_token_env(),
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Validates the URL scheme. Returns an error message when invalid.
    pub fn validate_url(&self) -> Option<String> {
        match &self.url {
            Some(url) if url.starts_with("ws://") || url.starts_with("wss://") => None,
            Some(url) => Some(format!("invalid server URL '{}': must be ws:// or wss://", url)),
            None => None,
        }
    }
}

impl Config {
    /// Loads configuration from the given `.tfsync/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(message) = config.server.validate_url() {
            return Err(Error::Config(message));
        }
        Ok(config)
    }

    /// Saves configuration to the given `.tfsync/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Returns true if a server endpoint is configured.
    pub fn is_online(&self) -> bool {
        self.server.url.is_some()
    }

    /// Engine settings with the journal resolved against the project root.
    ///
    /// The journal always lives somewhere: `.tfsync/journal.jsonl` unless
    /// configured otherwise.
    pub fn engine_config(&self, work_dir: &Path) -> EngineConfig {
        let journal = match &self.engine.journal {
            Some(path) => resolve(work_dir, path),
            None => work_dir.join(JOURNAL_FILE_NAME),
        };
        EngineConfig {
            journal: Some(journal),
            ..self.engine.clone()
        }
    }

    /// Directory downloads are written to.
    pub fn download_dir(&self, work_dir: &Path) -> PathBuf {
        match &self.download_dir {
            Some(path) => resolve(work_dir, path),
            None => dirs::cache_dir()
                .map(|dir| dir.join("tfsync").join(DOWNLOAD_DIR_NAME))
                .unwrap_or_else(|| work_dir.join(DOWNLOAD_DIR_NAME)),
        }
    }

    /// Log destination, if any.
    pub fn log_path(&self, work_dir: &Path) -> Option<PathBuf> {
        self.log_file.as_ref().map(|path| resolve(work_dir, path))
    }
}

/// Resolves a configured path relative to the project root.
fn resolve(work_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root(work_dir).join(path)
    }
}

/// The directory containing `.tfsync/`.
pub fn project_root(work_dir: &Path) -> &Path {
    work_dir.parent().unwrap_or(work_dir)
}

/// Path of the item metadata cache.
pub fn cache_path(work_dir: &Path) -> PathBuf {
    work_dir.join(CACHE_FILE_NAME)
}

/// Find the .tfsync directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    find_work_dir_from(&current)
}

/// Find the .tfsync directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Initialize a new .tfsync directory at the given path
///
/// Writes the configuration and the workspace registry.
pub fn init_work_dir(path: &Path, config: &Config, info: &WorkspaceInfo) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }
    if let Some(message) = config.server.validate_url() {
        return Err(Error::Config(message));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    Registry::new(&work_dir).save(info)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
