// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Tests for the public `run()` function.
//!
//! Commands that attach a workspace need a server and are covered by the
//! RPC store tests. Offline commands are routed here.

use crate::{Command, QueryCommand};

#[test]
fn test_query_optimize_runs_offline() {
    let cmd = Command::Query(QueryCommand::Optimize {
        query: "(([a] = 1))".to_string(),
    });
    assert!(crate::run(cmd).is_ok());
}

#[test]
fn test_query_xml_reports_syntax_errors() {
    let cmd = Command::Query(QueryCommand::Xml {
        query: "[a] = ".to_string(),
        me: Some("alice".to_string()),
        today: None,
        params: Vec::new(),
    });
    let err = crate::run(cmd).unwrap_err();
    assert!(matches!(
        err,
        crate::Error::Engine(tfsync_core::Error::QuerySyntax { .. })
    ));
}

#[test]
fn test_lock_level_is_checked_before_connecting() {
    let cmd = Command::Lock {
        paths: vec!["a.txt".to_string()],
        level: "exclusive".to_string(),
    };
    let err = crate::run(cmd).unwrap_err();
    assert!(matches!(err, crate::Error::InvalidInput(_)));
}

#[test]
fn test_resolution_is_checked_before_connecting() {
    let cmd = Command::Resolve {
        conflict_id: 1,
        resolution: "mine-please".to_string(),
    };
    let err = crate::run(cmd).unwrap_err();
    assert!(matches!(err, crate::Error::InvalidInput(_)));
}
