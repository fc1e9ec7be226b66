// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tuning passed explicitly to each workspace.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings that shape how a workspace applies and records changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest number of version updates per write-back call. `None` sends
    /// a whole batch at once.
    pub write_back_chunk_size: Option<usize>,
    /// JSONL file mirroring unflushed version updates.
    pub journal: Option<PathBuf>,
    /// Mark downloaded files read-only until they are checked out for edit.
    pub read_only_gets: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            write_back_chunk_size: None,
            journal: None,
            read_only_gets: true,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"write_back_chunk_size": 50}"#).unwrap();
        assert_eq!(config.write_back_chunk_size, Some(50));
        assert!(config.read_only_gets);
        assert!(config.journal.is_none());
    }
}
