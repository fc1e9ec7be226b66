// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server and local path helpers.
//!
//! Server paths are rooted at `$/`, delimited by forward slashes and
//! compared case-insensitively. Local paths are OS-native; they compare
//! case-insensitively only on platforms whose default filesystems do.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// The repository root.
pub const SERVER_ROOT: &str = "$/";

/// Normalizes a server path.
///
/// Backslashes become forward slashes, repeated separators collapse and a
/// trailing separator is dropped. `$` alone is the root.
pub fn normalize_server(path: &str) -> Result<String> {
    let trimmed = path.trim();
    let unified = trimmed.replace('\\', "/");
    if unified == "$" {
        return Ok(SERVER_ROOT.to_string());
    }
    let rest = unified
        .strip_prefix("$/")
        .ok_or_else(|| Error::InvalidServerPath(path.to_string()))?;

    let mut parts = Vec::new();
    for part in rest.split('/').filter(|p| !p.is_empty()) {
        if part == "." || part == ".." {
            return Err(Error::InvalidServerPath(path.to_string()));
        }
        parts.push(part);
    }
    Ok(format!("{SERVER_ROOT}{}", parts.join("/")))
}

/// Normalized form of `path`, or `path` itself when it is not a valid
/// server path.
pub fn canonical_server(path: &str) -> Cow<'_, str> {
    match normalize_server(path) {
        Ok(normalized) if normalized != path => Cow::Owned(normalized),
        _ => Cow::Borrowed(path),
    }
}

/// Returns true if the string looks like a server path.
pub fn is_server_path(path: &str) -> bool {
    let trimmed = path.trim();
    trimmed == "$" || trimmed.starts_with("$/") || trimmed.starts_with("$\\")
}

/// Case-insensitive prefix strip that returns the remainder of `s` in its
/// original casing.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = s.char_indices();
    for p in prefix.chars() {
        let (_, c) = rest.next()?;
        if !c.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    match rest.next() {
        Some((idx, _)) => Some(&s[idx..]),
        None => Some(""),
    }
}

/// Case-insensitive server path equality.
pub fn server_eq(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count() && strip_prefix_ci(a, b) == Some("")
}

/// Returns the portion of `candidate` below `parent`, or `None` if it is not
/// inside it. Equal paths yield an empty string.
pub fn server_relative<'a>(parent: &str, candidate: &'a str) -> Option<&'a str> {
    let rest = strip_prefix_ci(candidate, parent)?;
    if rest.is_empty() {
        return Some(rest);
    }
    if parent.ends_with('/') {
        return Some(rest);
    }
    rest.strip_prefix('/')
}

/// Returns true if `candidate` equals `parent` or lies beneath it.
pub fn is_server_sub_item(candidate: &str, parent: &str) -> bool {
    server_relative(parent, candidate).is_some()
}

/// Returns the parent of a normalized server path; the root has none.
pub fn server_parent(path: &str) -> Option<String> {
    if path == SERVER_ROOT {
        return None;
    }
    let idx = path.rfind('/')?;
    if idx <= 1 {
        Some(SERVER_ROOT.to_string())
    } else {
        Some(path[..idx].to_string())
    }
}

/// Appends a relative, slash-delimited suffix to a server path.
pub fn server_join(parent: &str, relative: &str) -> String {
    let relative = relative.trim_matches('/');
    if relative.is_empty() {
        parent.to_string()
    } else if parent.ends_with('/') {
        format!("{parent}{relative}")
    } else {
        format!("{parent}/{relative}")
    }
}

/// Number of segments below the root.
pub fn server_depth(path: &str) -> usize {
    path.trim_start_matches(SERVER_ROOT)
        .split('/')
        .filter(|p| !p.is_empty())
        .count()
}

/// Last segment of a server path.
pub fn server_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns true if local paths on this platform compare case-insensitively.
pub fn local_case_insensitive() -> bool {
    cfg!(any(windows, target_os = "macos"))
}

/// Lexically normalizes a local path: drops `.` segments, resolves `..`
/// against preceding segments and strips trailing separators.
pub fn normalize_local(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

fn component_eq(a: &Component<'_>, b: &Component<'_>) -> bool {
    if local_case_insensitive() {
        a.as_os_str().to_string_lossy().to_lowercase()
            == b.as_os_str().to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}

/// Returns the segments of `path` below `base`, or `None` if `path` is not
/// inside `base`. Equal paths yield an empty list.
pub fn local_relative(base: &Path, path: &Path) -> Option<Vec<String>> {
    let base = normalize_local(base);
    let path = normalize_local(path);
    let mut base_iter = base.components();
    let mut path_iter = path.components();
    loop {
        match (base_iter.next(), path_iter.next()) {
            (None, None) => return Some(Vec::new()),
            (None, Some(first)) => {
                let mut rest = vec![first.as_os_str().to_string_lossy().into_owned()];
                rest.extend(path_iter.map(|c| c.as_os_str().to_string_lossy().into_owned()));
                return Some(rest);
            }
            (Some(_), None) => return None,
            (Some(b), Some(p)) => {
                if !component_eq(&b, &p) {
                    return None;
                }
            }
        }
    }
}

/// Returns true if `path` equals `base` or lies beneath it.
pub fn is_local_sub_item(path: &Path, base: &Path) -> bool {
    local_relative(base, path).is_some()
}

/// Local path equality honoring platform case sensitivity.
pub fn local_eq(a: &Path, b: &Path) -> bool {
    matches!(local_relative(a, b), Some(rest) if rest.is_empty())
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
