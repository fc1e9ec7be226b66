// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::remote::RemoteErrorKind;
use yare::parameterized;

#[parameterized(
    configuration = { Error::Configuration("overlaps $/a".into()), "overlaps $/a" },
    server_path = { Error::InvalidServerPath("a/b".into()), "$/" },
    not_mapped = { Error::NotMapped("/tmp/x".into()), "workfold map" },
    node_order = { Error::InvalidNodeOrder("expected operator".into()), "expected operator" },
    parameter = { Error::UnknownParameter("project".into()), "@project" },
    conflict = { Error::ConflictNotActive(42), "42" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_query_syntax_display() {
    let err = Error::QuerySyntax {
        offset: 7,
        message: "expected field".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("offset 7"));
    assert!(msg.contains("expected field"));
}

#[test]
fn error_local_io_includes_path() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = Error::local_io("/work/a.txt", io_err);
    let msg = err.to_string();
    assert!(msg.contains("/work/a.txt"));
    assert!(msg.contains("denied"));
}

#[test]
fn error_from_remote() {
    let remote = RemoteError::new(RemoteErrorKind::Fault, "ItemNotFound", "no such item");
    let err: Error = remote.into();
    assert!(matches!(err, Error::Remote(_)));
    assert!(err.to_string().contains("no such item"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
