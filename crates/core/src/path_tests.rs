// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    root_dollar = { "$", "$/" },
    root_slash = { "$/", "$/" },
    plain = { "$/Project/src", "$/Project/src" },
    trailing = { "$/Project/src/", "$/Project/src" },
    doubled = { "$//Project//src", "$/Project/src" },
    backslash = { "$\\Project\\src", "$/Project/src" },
    padded = { "  $/Project ", "$/Project" },
)]
fn normalize_server_valid(input: &str, expected: &str) {
    assert_eq!(normalize_server(input).unwrap(), expected);
}

#[parameterized(
    relative = { "Project/src" },
    empty = { "" },
    parent_segment = { "$/Project/../other" },
    local = { "/home/user/src" },
)]
fn normalize_server_invalid(input: &str) {
    assert!(matches!(
        normalize_server(input),
        Err(Error::InvalidServerPath(_))
    ));
}

#[parameterized(
    same = { "$/Project", "$/project", true },
    differ = { "$/Project", "$/Other", false },
    prefix_only = { "$/Project", "$/Projects", false },
)]
fn server_eq_cases(a: &str, b: &str, expected: bool) {
    assert_eq!(server_eq(a, b), expected);
}

#[parameterized(
    equal = { "$/A", "$/a", Some("") },
    child = { "$/A", "$/a/b.txt", Some("b.txt") },
    deep = { "$/A", "$/A/B/C", Some("B/C") },
    root = { "$/", "$/A/B", Some("A/B") },
    sibling_prefix = { "$/A", "$/AB/c", None },
    outside = { "$/A/B", "$/A", None },
)]
fn server_relative_cases(parent: &str, candidate: &str, expected: Option<&str>) {
    assert_eq!(server_relative(parent, candidate), expected);
}

#[test]
fn server_relative_preserves_candidate_casing() {
    assert_eq!(server_relative("$/proj", "$/PROJ/Src/Main.rs"), Some("Src/Main.rs"));
}

#[parameterized(
    root = { "$/", None },
    top = { "$/A", Some("$/") },
    nested = { "$/A/B/c.txt", Some("$/A/B") },
)]
fn server_parent_cases(path: &str, expected: Option<&str>) {
    assert_eq!(server_parent(path).as_deref(), expected);
}

#[test]
fn server_join_handles_root_and_slashes() {
    assert_eq!(server_join("$/", "A/b"), "$/A/b");
    assert_eq!(server_join("$/A", "/b/"), "$/A/b");
    assert_eq!(server_join("$/A", ""), "$/A");
}

#[test]
fn server_depth_and_file_name() {
    assert_eq!(server_depth("$/"), 0);
    assert_eq!(server_depth("$/A/B"), 2);
    assert_eq!(server_file_name("$/A/B/c.txt"), "c.txt");
}

#[test]
fn is_server_path_detects_root_prefix() {
    assert!(is_server_path("$/A"));
    assert!(is_server_path("$"));
    assert!(!is_server_path("/tmp/A"));
}

#[test]
fn normalize_local_resolves_dots() {
    let path = Path::new("/work/./src/../lib/");
    assert_eq!(normalize_local(path), PathBuf::from("/work/lib"));
}

#[test]
fn local_relative_inside() {
    let rel = local_relative(Path::new("/work"), Path::new("/work/src/main.rs")).unwrap();
    assert_eq!(rel, vec!["src".to_string(), "main.rs".to_string()]);
}

#[test]
fn local_relative_equal_is_empty() {
    let rel = local_relative(Path::new("/work/"), Path::new("/work")).unwrap();
    assert!(rel.is_empty());
}

#[test]
fn local_relative_outside() {
    assert!(local_relative(Path::new("/work/src"), Path::new("/work")).is_none());
    assert!(local_relative(Path::new("/work"), Path::new("/workspace/a")).is_none());
}

#[test]
fn local_eq_matches_normalized_forms() {
    assert!(local_eq(Path::new("/work/src/"), Path::new("/work/./src")));
    assert!(!local_eq(Path::new("/work/src"), Path::new("/work/lib")));
}
