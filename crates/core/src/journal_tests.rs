// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::{tempdir, TempDir};

fn present(id: i32) -> UpdateLocalVersion {
    UpdateLocalVersion::present(id, PathBuf::from(format!("/w/{id}.txt")), id * 2)
}

fn journal() -> (TempDir, Journal) {
    let dir = tempdir().unwrap();
    let journal = Journal::new(dir.path().join("journal.jsonl"));
    (dir, journal)
}

#[test]
fn missing_file_loads_empty() {
    let (_dir, journal) = journal();
    assert!(journal.load().unwrap().is_empty());
}

#[test]
fn appends_load_in_order() {
    let (_dir, journal) = journal();

    journal.append(&present(1)).unwrap();
    journal.append(&UpdateLocalVersion::absent(2)).unwrap();

    assert_eq!(
        journal.load().unwrap(),
        vec![present(1), UpdateLocalVersion::absent(2)]
    );
}

#[test]
fn blank_lines_are_skipped() {
    let (_dir, journal) = journal();
    std::fs::write(
        journal.path(),
        "{\"item_id\":1,\"local_path\":null,\"server_version\":0}\n\n  \n",
    )
    .unwrap();

    assert_eq!(journal.load().unwrap(), vec![UpdateLocalVersion::absent(1)]);
}

#[test]
fn partial_last_entry_is_dropped() {
    let (_dir, journal) = journal();
    journal.append(&present(1)).unwrap();
    let mut file = OpenOptions::new().append(true).open(journal.path()).unwrap();
    write!(file, "{{\"item_id\":2,\"local_pa").unwrap();

    assert_eq!(journal.load().unwrap(), vec![present(1)]);
}

#[test]
fn damaged_middle_entry_fails() {
    let (_dir, journal) = journal();
    std::fs::write(journal.path(), "not json\n").unwrap();
    journal.append(&present(1)).unwrap();

    let err = journal.load().unwrap_err();
    assert!(matches!(err, Error::CorruptedData(ref m) if m.contains("line 1")));
}

#[test]
fn replace_rewrites_content() {
    let (_dir, journal) = journal();
    journal.append(&present(1)).unwrap();
    journal.append(&present(2)).unwrap();

    journal.replace(&[present(3)]).unwrap();

    assert_eq!(journal.load().unwrap(), vec![present(3)]);
    assert!(!journal.path().with_extension("jsonl.tmp").exists());
}

#[test]
fn replace_with_nothing_removes_file() {
    let (_dir, journal) = journal();
    journal.append(&present(1)).unwrap();

    journal.replace(&[]).unwrap();
    assert!(!journal.path().exists());

    journal.replace(&[]).unwrap();
}

#[test]
fn repair_cuts_partial_tail_before_next_append() {
    let (_dir, journal) = journal();
    journal.append(&present(1)).unwrap();
    let mut file = OpenOptions::new().append(true).open(journal.path()).unwrap();
    write!(file, "{{\"item_id\":2,\"local_pa").unwrap();

    assert_eq!(journal.repair().unwrap(), vec![present(1)]);
    journal.append(&UpdateLocalVersion::absent(7)).unwrap();

    assert_eq!(
        journal.load().unwrap(),
        vec![present(1), UpdateLocalVersion::absent(7)]
    );
}

#[test]
fn repair_terminates_complete_unterminated_entry() {
    let (_dir, journal) = journal();
    std::fs::write(
        journal.path(),
        "{\"item_id\":1,\"local_path\":null,\"server_version\":0}",
    )
    .unwrap();

    assert_eq!(journal.repair().unwrap(), vec![UpdateLocalVersion::absent(1)]);
    journal.append(&present(2)).unwrap();

    assert_eq!(
        journal.load().unwrap(),
        vec![UpdateLocalVersion::absent(1), present(2)]
    );
}

#[test]
fn repair_leaves_clean_journal_alone() {
    let (_dir, journal) = journal();
    journal.append(&present(1)).unwrap();
    let before = std::fs::read_to_string(journal.path()).unwrap();

    assert_eq!(journal.repair().unwrap(), vec![present(1)]);
    assert_eq!(std::fs::read_to_string(journal.path()).unwrap(), before);
}
