// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk mirror of the write-back queue.
//!
//! One [`UpdateLocalVersion`] per line, fsynced after every append. A crash
//! in the middle of an append can leave a partial last line; it is dropped
//! on load and cut from the file by [`Journal::repair`]. A malformed line anywhere else means the file was damaged and
//! loading fails.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::operation::UpdateLocalVersion;

/// Append-only record of version updates not yet acknowledged by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Journal { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records one update durably.
    pub fn append(&self, update: &UpdateLocalVersion) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(update)?)?;
        file.sync_all()?;
        Ok(())
    }

    /// Reads every recorded update in append order. A missing file is empty.
    pub fn load(&self) -> Result<Vec<UpdateLocalVersion>> {
        self.read().map(|(updates, _)| updates)
    }

    /// Loads the journal and leaves it ready for appends.
    ///
    /// When the file does not end on a line boundary it is rewritten with
    /// the complete entries only, so the next append starts a fresh line.
    pub fn repair(&self) -> Result<Vec<UpdateLocalVersion>> {
        let (updates, unterminated) = self.read()?;
        if unterminated {
            tracing::info!(
                path = %self.path.display(),
                count = updates.len(),
                "rewriting journal without its partial tail"
            );
            self.replace(&updates)?;
        }
        Ok(updates)
    }

    /// Parsed entries, and whether the file ends mid-line.
    fn read(&self) -> Result<(Vec<UpdateLocalVersion>, bool)> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), false)),
            Err(e) => return Err(e.into()),
        };
        let unterminated = !content.is_empty() && !content.ends_with('\n');

        let lines: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();
        let mut updates = Vec::with_capacity(lines.len());
        for (i, (number, line)) in lines.iter().enumerate() {
            match serde_json::from_str(line) {
                Ok(update) => updates.push(update),
                Err(_) if i + 1 == lines.len() && unterminated => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = number + 1,
                        "dropping partial journal entry"
                    );
                }
                Err(e) => {
                    return Err(Error::CorruptedData(format!(
                        "{} line {}: {}",
                        self.path.display(),
                        number + 1,
                        e
                    )))
                }
            }
        }
        Ok((updates, unterminated))
    }

    /// Replaces the journal with `updates`; removes the file when empty.
    ///
    /// The new content is written to a sibling file first and renamed over
    /// the journal.
    pub fn replace(&self, updates: &[UpdateLocalVersion]) -> Result<()> {
        if updates.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        let staging = self.path.with_extension("jsonl.tmp");
        let mut file = File::create(&staging)?;
        for update in updates {
            writeln!(file, "{}", serde_json::to_string(update)?)?;
        }
        file.sync_all()?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
