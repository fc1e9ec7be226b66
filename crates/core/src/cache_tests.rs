// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::item::ItemType;
use crate::test_helpers::{extended, workspace_id, MockRemote};
use tempfile::{tempdir, TempDir};

fn setup() -> (TempDir, Arc<MockRemote>, WorkspaceCache) {
    let dir = tempdir().unwrap();
    let remote = Arc::new(MockRemote::new(dir.path()));
    let cache = WorkspaceCache::in_memory(remote.clone()).unwrap();
    (dir, remote, cache)
}

fn paths(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| p.to_string()).collect()
}

#[test]
fn single_lookups_are_served_from_cache() {
    let (_dir, remote, cache) = setup();
    remote.state().extended_items = vec![extended("$/P/a.txt", 3)];
    let ws = workspace_id();

    let first = cache
        .get_items(&ws, &paths(&["$/P/a.txt"]), RecursionType::None)
        .unwrap();
    remote.state().extended_items = vec![extended("$/P/a.txt", 9)];
    let second = cache
        .get_items(&ws, &paths(&["$/P/A.TXT"]), RecursionType::None)
        .unwrap();

    assert_eq!(first[0].version_latest, 3);
    assert_eq!(second[0].version_latest, 3);
    assert_eq!(remote.state().call_count("query_items_extended"), 1);
}

#[test]
fn unnormalized_paths_hit_the_same_row() {
    let (_dir, remote, cache) = setup();
    remote.state().extended_items = vec![extended("$/P/a", 4)];
    let ws = workspace_id();
    cache
        .get_items(&ws, &paths(&["$/P/a"]), RecursionType::None)
        .unwrap();

    let items = cache
        .get_items(&ws, &paths(&["$/P/a/"]), RecursionType::None)
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].version_latest, 4);
    assert!(cache.cached(&ws, "$\\P//a").unwrap().is_some());
    assert_eq!(remote.state().call_count("query_items_extended"), 1);

    assert_eq!(cache.invalidate(&ws, &paths(&["$/P/a/"])).unwrap(), 1);
}

#[test]
fn only_misses_are_fetched() {
    let (_dir, remote, cache) = setup();
    remote.state().extended_items = vec![extended("$/P/a", 1), extended("$/P/b", 2)];
    let ws = workspace_id();
    cache
        .get_items(&ws, &paths(&["$/P/a"]), RecursionType::None)
        .unwrap();

    let items = cache
        .get_items(&ws, &paths(&["$/P/b", "$/P/a", "$/P/missing"]), RecursionType::None)
        .unwrap();

    let got: Vec<_> = items.iter().map(|i| i.server_path.as_str()).collect();
    assert_eq!(got, vec!["$/P/b", "$/P/a"]);
    assert_eq!(remote.state().call_count("query_items_extended"), 2);
}

#[test]
fn recursive_queries_bypass_but_populate_cache() {
    let (_dir, remote, cache) = setup();
    remote.state().extended_items = vec![
        extended("$/P", 1),
        extended("$/P/a", 2),
        extended("$/P/sub/b", 3),
    ];
    let ws = workspace_id();

    let items = cache
        .get_items(&ws, &paths(&["$/P"]), RecursionType::Full)
        .unwrap();
    assert_eq!(items.len(), 3);
    cache
        .get_items(&ws, &paths(&["$/P"]), RecursionType::Full)
        .unwrap();
    assert_eq!(remote.state().call_count("query_items_extended"), 2);

    // Rows stored by the recursive query satisfy single lookups
    let single = cache
        .get_items(&ws, &paths(&["$/P/sub/b"]), RecursionType::None)
        .unwrap();
    assert_eq!(single[0].version_latest, 3);
    assert_eq!(remote.state().call_count("query_items_extended"), 2);
}

#[test]
fn refresh_then_get_reflects_refreshed_entry() {
    let (_dir, remote, cache) = setup();
    remote.state().extended_items = vec![extended("$/P/a", 1)];
    let ws = workspace_id();
    cache
        .get_items(&ws, &paths(&["$/P/a"]), RecursionType::None)
        .unwrap();

    let mut newer = extended("$/P/a", 5);
    newer.version_local = 5;
    newer.local_path = Some(PathBuf::from("/work/a"));
    newer.change_type = ChangeType::EDIT | ChangeType::LOCK;
    newer.is_locked = true;
    newer.lock_owner = Some("bob".into());
    remote.state().extended_items = vec![newer.clone()];

    let refreshed = cache.refresh_item(&ws, "$/P/a").unwrap();
    assert_eq!(refreshed, Some(newer.clone()));

    let got = cache
        .get_items(&ws, &paths(&["$/P/a"]), RecursionType::None)
        .unwrap();
    assert_eq!(got, vec![newer]);
}

#[test]
fn refresh_evicts_items_the_server_dropped() {
    let (_dir, remote, cache) = setup();
    remote.state().extended_items = vec![extended("$/P/a", 1), extended("$/P/b", 1)];
    let ws = workspace_id();
    cache
        .get_items(&ws, &paths(&["$/P/a", "$/P/b"]), RecursionType::None)
        .unwrap();

    remote.state().extended_items = vec![extended("$/P/b", 2)];
    cache.refresh_items(&ws, &paths(&["$/P/a", "$/P/b"])).unwrap();

    assert!(cache.cached(&ws, "$/P/a").unwrap().is_none());
    assert_eq!(cache.cached(&ws, "$/P/b").unwrap().unwrap().version_latest, 2);
}

#[test]
fn workspaces_do_not_share_rows() {
    let (_dir, remote, cache) = setup();
    remote.state().extended_items = vec![extended("$/P/a", 1)];
    let ws = workspace_id();
    let other = WorkspaceId::new("other", "bob");

    cache
        .get_items(&ws, &paths(&["$/P/a"]), RecursionType::None)
        .unwrap();

    assert_eq!(cache.len(&ws).unwrap(), 1);
    assert_eq!(cache.len(&other).unwrap(), 0);
    assert!(cache.cached(&other, "$/P/a").unwrap().is_none());
}

#[test]
fn invalidate_and_clear() {
    let (_dir, remote, cache) = setup();
    remote.state().extended_items = vec![extended("$/P/a", 1), extended("$/P/b", 1)];
    let ws = workspace_id();
    cache
        .get_items(&ws, &paths(&["$/P"]), RecursionType::Full)
        .unwrap();

    assert_eq!(cache.invalidate(&ws, &paths(&["$/p/A"])).unwrap(), 1);
    assert_eq!(cache.len(&ws).unwrap(), 1);
    assert_eq!(cache.clear(&ws).unwrap(), 1);
    assert_eq!(cache.len(&ws).unwrap(), 0);
}

#[test]
fn on_disk_cache_persists_rows() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("cache/items.db");
    let remote = Arc::new(MockRemote::new(dir.path()));
    let mut folder = extended("$/P/docs", 4);
    folder.item_type = ItemType::Folder;
    remote.state().extended_items = vec![folder.clone()];
    let ws = workspace_id();

    {
        let cache = WorkspaceCache::open(&db, remote.clone()).unwrap();
        cache
            .get_items(&ws, &paths(&["$/P/docs"]), RecursionType::None)
            .unwrap();
    }

    let reopened = WorkspaceCache::open(&db, remote).unwrap();
    assert_eq!(reopened.cached(&ws, "$/P/docs").unwrap(), Some(folder));
}
