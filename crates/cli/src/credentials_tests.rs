// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

#[test]
fn test_token_becomes_bearer() {
    let auth = token_from("TOKEN", |_| Some("abc123".to_string())).unwrap();
    assert_eq!(auth, "Bearer abc123");
}

#[test]
fn test_token_is_trimmed() {
    let auth = token_from("TOKEN", |_| Some("  abc\n".to_string())).unwrap();
    assert_eq!(auth, "Bearer abc");
}

#[parameterized(
    unset = { None },
    empty = { Some("") },
    blank = { Some("   ") },
)]
fn test_missing_token_is_unauthorized(value: Option<&str>) {
    let err = token_from("MY_TOKEN", |_| value.map(String::from)).unwrap_err();
    assert_eq!(err.kind, RemoteErrorKind::Unauthorized);
    assert!(err.message.contains("MY_TOKEN"));
}

#[test]
fn test_lookup_uses_configured_variable() {
    let auth = token_from("TFS_PAT", |key| (key == "TFS_PAT").then(|| "x".to_string()));
    assert!(auth.is_ok());
}

#[test]
fn test_provider_keeps_variable_name() {
    assert_eq!(EnvTokenProvider::new("TFSYNC_TOKEN").var(), "TFSYNC_TOKEN");
}
