// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn op(change_type: ChangeType, source: Option<&str>, target: Option<&str>) -> GetOperation {
    GetOperation {
        item_id: 1,
        change_type,
        item_type: ItemType::File,
        source_local_path: source.map(PathBuf::from),
        target_local_path: target.map(PathBuf::from),
        source_server_path: None,
        target_server_path: "$/A/f.txt".into(),
        server_version: 3,
        deletion_id: 0,
        artifact_uri: None,
        content_hash: None,
    }
}

#[parameterized(
    plain_get = { ChangeType::NONE, Some("/w/f"), Some("/w/f"), GetAction::Get },
    new_item = { ChangeType::NONE, None, Some("/w/f"), GetAction::Get },
    add = { ChangeType::ADD, None, Some("/w/f"), GetAction::Add },
    edit = { ChangeType::EDIT, Some("/w/f"), Some("/w/f"), GetAction::Edit },
    rename = { ChangeType::RENAME, Some("/w/f"), Some("/w/g"), GetAction::Rename },
    rename_edit = { ChangeType::RENAME | ChangeType::EDIT, Some("/w/f"), Some("/w/g"), GetAction::Rename },
    rename_in_place = { ChangeType::RENAME | ChangeType::EDIT, Some("/w/f"), Some("/w/f"), GetAction::Edit },
    delete_flag = { ChangeType::DELETE, Some("/w/f"), Some("/w/f"), GetAction::Delete },
    no_target = { ChangeType::NONE, Some("/w/f"), None, GetAction::Delete },
)]
fn classifies_action(
    change_type: ChangeType,
    source: Option<&str>,
    target: Option<&str>,
    expected: GetAction,
) {
    assert_eq!(op(change_type, source, target).action(), expected);
}

#[test]
fn local_path_prefers_target() {
    let o = op(ChangeType::RENAME, Some("/w/f"), Some("/w/g"));
    assert_eq!(o.local_path(), Some(&PathBuf::from("/w/g")));
    let o = op(ChangeType::NONE, Some("/w/f"), None);
    assert_eq!(o.local_path(), Some(&PathBuf::from("/w/f")));
}

#[test]
fn absent_update_has_no_path() {
    let update = UpdateLocalVersion::absent(9);
    assert!(update.is_absent());
    assert_eq!(update.item_id, 9);
    assert!(!UpdateLocalVersion::present(9, "/w/f".into(), 2).is_absent());
}

#[test]
fn get_operation_json_defaults() {
    let json = r#"{"item_id":5,"item_type":"folder","target_local_path":"/w/d","server_version":7}"#;
    let parsed: GetOperation = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.change_type, ChangeType::NONE);
    assert_eq!(parsed.item_type, ItemType::Folder);
    assert_eq!(parsed.action(), GetAction::Get);
}
