// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem seam used when applying operations to the working copy.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One entry found while enumerating a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Byte-level filesystem operations needed by the engine.
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Writes bytes, replacing any existing file.
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Moves a file or directory. Falls back to copy-then-delete when a
    /// plain rename is not possible.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    fn set_read_only(&self, path: &Path, read_only: bool) -> io::Result<()>;

    fn is_read_only(&self, path: &Path) -> io::Result<bool>;

    /// Lists everything beneath `root`, excluding `root` itself.
    fn walk(&self, root: &Path) -> io::Result<Vec<LocalEntry>>;
}

/// [`Filesystem`] over the real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        LocalFilesystem
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        fs::write(path, content)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if from.is_file() && e.kind() != io::ErrorKind::NotFound => {
                // Cross-device moves cannot be renamed in place
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            Err(e) => Err(e),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    #[cfg(unix)]
    fn set_read_only(&self, path: &Path, read_only: bool) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)?.permissions();
        let mode = perms.mode();
        let mode = if read_only {
            mode & !0o222
        } else {
            mode | 0o200
        };
        perms.set_mode(mode);
        fs::set_permissions(path, perms)
    }

    #[cfg(not(unix))]
    fn set_read_only(&self, path: &Path, read_only: bool) -> io::Result<()> {
        let mut perms = fs::metadata(path)?.permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(read_only);
        fs::set_permissions(path, perms)
    }

    fn is_read_only(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::metadata(path)?.permissions().readonly())
    }

    fn walk(&self, root: &Path) -> io::Result<Vec<LocalEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::other)?;
            entries.push(LocalEntry {
                is_dir: entry.file_type().is_dir(),
                path: entry.into_path(),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
