// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::config::init_work_dir;
use tempfile::TempDir;
use tfsync_core::RecursionType;

fn project(folders: &[(&str, Option<&str>)]) -> (TempDir, Project) {
    let temp = TempDir::new().unwrap();
    let mut mapper = PathMapper::new();
    for (server, local) in folders {
        match local {
            Some(local) => mapper.map(server, temp.path().join(local)).unwrap(),
            None => mapper.cloak(server).unwrap(),
        }
    }
    let mut info = WorkspaceInfo::new("dev", "alice");
    info.folders = mapper.folders().to_vec();
    let work_dir = init_work_dir(temp.path(), &Config::default(), &info).unwrap();
    let project = Project::open(work_dir).unwrap();
    (temp, project)
}

// ─────────────────────────────────────────────────────────────────────────────
// Opening
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn open_requires_config() {
    let temp = TempDir::new().unwrap();
    let result = Project::open(temp.path().join(".tfsync"));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn info_and_mapper_come_from_registry() {
    let (_temp, project) = project(&[("$/P", Some("p"))]);

    assert_eq!(project.info().unwrap().name, "dev");
    assert_eq!(project.mapper().unwrap().folders().len(), 1);
    assert!(!project.config().is_online());
}

#[test]
fn connect_without_server_fails() {
    let (_temp, project) = project(&[("$/P", Some("p"))]);
    let result = project.connect();
    assert!(matches!(result, Err(Error::NoServer)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Path arguments
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn absolute_local_paths_are_normalized() {
    let temp = TempDir::new().unwrap();
    let arg = temp.path().join("a").join("..").join("b");
    let resolved = local_path(arg.to_str().unwrap()).unwrap();
    assert_eq!(resolved, temp.path().join("b"));
}

#[test]
fn server_arguments_are_normalized() {
    let mapper = PathMapper::new();
    assert_eq!(server_path(&mapper, "$/P//src/").unwrap(), "$/P/src");
}

#[test]
fn local_arguments_go_through_mappings() {
    let (temp, project) = project(&[("$/P", Some("p"))]);
    let mapper = project.mapper().unwrap();
    let arg = temp.path().join("p").join("src").join("main.c");

    let server = server_path(&mapper, arg.to_str().unwrap()).unwrap();
    assert_eq!(server, "$/P/src/main.c");
}

#[test]
fn unmapped_local_argument_fails() {
    let (temp, project) = project(&[("$/P", Some("p"))]);
    let mapper = project.mapper().unwrap();
    let arg = temp.path().join("elsewhere");

    let err = server_path(&mapper, arg.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, Error::Engine(tfsync_core::Error::NotMapped(_))));
}

#[test]
fn empty_scope_covers_mapped_folders_only() {
    let (_temp, project) = project(&[("$/P", Some("p")), ("$/P/bin", None)]);
    let specs = scope_specs(&project.mapper().unwrap(), &[]).unwrap();

    assert_eq!(specs, vec![ItemSpec::full("$/P")]);
    assert_eq!(specs[0].recursion, RecursionType::Full);
}

#[test]
fn empty_scope_without_mappings_fails() {
    let err = scope_specs(&PathMapper::new(), &[]).unwrap_err();
    assert!(err.to_string().contains("no working folders are mapped"));
}

#[test]
fn explicit_scope_is_recursive() {
    let specs = scope_specs(&PathMapper::new(), &["$/P/src".to_string()]).unwrap();
    assert_eq!(specs, vec![ItemSpec::full("$/P/src")]);
}

#[test]
fn cancel_token_starts_live() {
    assert!(!cancel_on_ctrl_c().is_cancelled());
}
