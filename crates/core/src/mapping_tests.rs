// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn mapper(pairs: &[(&str, &str)]) -> PathMapper {
    let mut mapper = PathMapper::new();
    for (server, local) in pairs {
        mapper.map(server, local).unwrap();
    }
    mapper
}

#[test]
fn unmapped_paths_resolve_to_none() {
    let mapper = PathMapper::new();
    assert!(mapper.server_path_for(Path::new("/work/a.txt")).is_none());
    assert!(mapper.local_path_for("$/Project/a.txt").is_none());
}

#[test]
fn resolves_local_to_server() {
    let mapper = mapper(&[("$/Project", "/work/project")]);
    assert_eq!(
        mapper
            .server_path_for(Path::new("/work/project/src/main.rs"))
            .as_deref(),
        Some("$/Project/src/main.rs")
    );
    assert_eq!(
        mapper.server_path_for(Path::new("/work/project")).as_deref(),
        Some("$/Project")
    );
}

#[test]
fn resolves_server_to_local_case_insensitively() {
    let mapper = mapper(&[("$/Project", "/work/project")]);
    assert_eq!(
        mapper.local_path_for("$/PROJECT/src/main.rs"),
        Some(PathBuf::from("/work/project/src/main.rs"))
    );
}

#[test]
fn longest_prefix_wins() {
    let mapper = mapper(&[
        ("$/Project", "/work/project"),
        ("$/Project/lib", "/libs/shared"),
    ]);
    assert_eq!(
        mapper.local_path_for("$/Project/lib/util.rs"),
        Some(PathBuf::from("/libs/shared/util.rs"))
    );
    assert_eq!(
        mapper.local_path_for("$/Project/src/main.rs"),
        Some(PathBuf::from("/work/project/src/main.rs"))
    );
    assert_eq!(
        mapper
            .server_path_for(Path::new("/libs/shared/util.rs"))
            .as_deref(),
        Some("$/Project/lib/util.rs")
    );
}

#[parameterized(
    top_file = { "/work/a/readme.md" },
    nested = { "/work/a/src/deep/file.rs" },
    folder_root = { "/work/a" },
    second_mapping = { "/other/b/x.txt" },
)]
fn round_trip_local_server_local(local: &str) {
    let mapper = mapper(&[("$/A", "/work/a"), ("$/B", "/other/b")]);
    let server = mapper.server_path_for(Path::new(local)).unwrap();
    assert_eq!(mapper.local_path_for(&server), Some(PathBuf::from(local)));
}

#[test]
fn identical_server_path_replaces_entry() {
    let mut mapper = mapper(&[("$/A", "/work/a")]);
    mapper.map("$/a/", "/elsewhere/a").unwrap();
    assert_eq!(mapper.folders().len(), 1);
    assert_eq!(
        mapper.local_path_for("$/A/x"),
        Some(PathBuf::from("/elsewhere/a/x"))
    );
}

#[test]
fn same_local_folder_twice_is_rejected() {
    let mut mapper = mapper(&[("$/A", "/work/a")]);
    let err = mapper.map("$/B", "/work/a").unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(mapper.folders().len(), 1);
}

#[parameterized(
    local_inside_unrelated_server = { "$/B", "/work/a/b" },
    local_around_unrelated_server = { "$/B", "/work" },
    local_around_child_server = { "$/A/child", "/work" },
)]
fn partial_overlap_is_rejected(server: &str, local: &str) {
    let mut mapper = mapper(&[("$/A", "/work/a")]);
    let before = mapper.clone();
    let err = mapper.map(server, local).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(mapper, before);
}

#[test]
fn consistent_nesting_is_allowed() {
    let mut mapper = mapper(&[("$/A", "/work/a")]);
    mapper.map("$/A/sub", "/work/a/elsewhere").unwrap();
    assert_eq!(mapper.folders().len(), 2);
}

#[test]
fn invalid_server_path_is_rejected() {
    let mut mapper = PathMapper::new();
    assert!(matches!(
        mapper.map("Project", "/work"),
        Err(Error::InvalidServerPath(_))
    ));
}

#[test]
fn cloak_hides_subtree() {
    let mut mapper = mapper(&[("$/A", "/work/a")]);
    mapper.cloak("$/A/bin").unwrap();

    assert!(mapper.local_path_for("$/A/bin/out.dll").is_none());
    assert!(mapper
        .server_path_for(Path::new("/work/a/bin/out.dll"))
        .is_none());
    assert!(mapper.is_mapped("$/A/src/main.rs"));
    assert!(mapper.is_cloaked("$/A/bin"));
}

#[test]
fn mapping_beneath_cloak_wins() {
    let mut mapper = mapper(&[("$/A", "/work/a")]);
    mapper.cloak("$/A/bin").unwrap();
    mapper.map("$/A/bin/keep", "/work/keep").unwrap();
    assert_eq!(
        mapper.local_path_for("$/A/bin/keep/x"),
        Some(PathBuf::from("/work/keep/x"))
    );
}

#[test]
fn cloak_requires_mapped_parent() {
    let mut mapper = mapper(&[("$/A", "/work/a")]);
    assert!(matches!(
        mapper.cloak("$/B/bin"),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn unmap_by_server_or_local_path() {
    let mut mapper = mapper(&[("$/A", "/work/a"), ("$/B", "/work/b")]);
    let removed = mapper.unmap("$/a").unwrap();
    assert_eq!(removed.server_path, "$/A");
    let removed = mapper.unmap("/work/b").unwrap();
    assert_eq!(removed.server_path, "$/B");
    assert!(mapper.is_empty());
}

#[test]
fn unmap_unknown_path_fails() {
    let mut mapper = PathMapper::new();
    assert!(matches!(mapper.unmap("$/A"), Err(Error::Configuration(_))));
}

#[test]
fn from_folders_rebuilds_mapper() {
    let original = {
        let mut m = mapper(&[("$/A", "/work/a")]);
        m.cloak("$/A/obj").unwrap();
        m
    };
    let rebuilt = PathMapper::from_folders(original.folders()).unwrap();
    assert_eq!(rebuilt, original);
}

#[test]
fn local_path_shadowed_by_nested_mapping_is_not_mapped() {
    let m = mapper(&[("$/a", "/x"), ("$/a/q", "/x/y")]);

    assert_eq!(m.server_path_for(Path::new("/x/q/f")), None);
    assert_eq!(
        m.server_path_for(Path::new("/x/y/f")).as_deref(),
        Some("$/a/q/f")
    );
    assert_eq!(
        m.server_path_for(Path::new("/x/z/f")).as_deref(),
        Some("$/a/z/f")
    );
    assert_eq!(m.local_path_for("$/a/q/f"), Some(PathBuf::from("/x/y/f")));
}

#[test]
fn unmap_drops_cloaks_left_uncovered() {
    let mut m = mapper(&[("$/Project", "/work/project")]);
    m.cloak("$/Project/bin").unwrap();

    m.unmap("$/Project").unwrap();

    assert!(m.folders().is_empty());
    assert_eq!(PathMapper::from_folders(m.folders()).unwrap(), m);
}

#[test]
fn unmap_keeps_cloaks_still_covered() {
    let mut m = mapper(&[("$/A", "/work/a"), ("$/A/sub", "/work/a/sub")]);
    m.cloak("$/A/sub/bin").unwrap();

    m.unmap("$/A/sub").unwrap();

    assert!(m.is_cloaked("$/A/sub/bin/tool"));
    assert_eq!(m.folders().len(), 2);
}

#[test]
fn from_folders_skips_uncovered_cloak() {
    let folders = vec![
        WorkingFolder::cloak("$/Gone/bin").unwrap(),
        WorkingFolder::map("$/A", "/work/a").unwrap(),
    ];

    let rebuilt = PathMapper::from_folders(&folders).unwrap();

    assert_eq!(rebuilt.folders(), &folders[1..]);
}

#[test]
fn from_folders_accepts_cloak_listed_before_its_mapping() {
    let folders = vec![
        WorkingFolder::cloak("$/A/bin").unwrap(),
        WorkingFolder::map("$/A", "/work/a").unwrap(),
    ];

    let rebuilt = PathMapper::from_folders(&folders).unwrap();

    assert!(rebuilt.is_cloaked("$/A/bin"));
}

#[test]
fn workspace_id_display() {
    let id = WorkspaceId::new("dev", "alice");
    assert_eq!(id.to_string(), "dev;alice");
}
