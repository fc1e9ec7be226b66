// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use similar_asserts::assert_eq;

fn stdout(args: &[&str]) -> String {
    let output = tfs().args(args).output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn xml_needs_no_project() {
    let temp = TempDir::new().unwrap();

    tfs()
        .args(["query", "xml", "[State] = 'Active'"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(concat!(
            r#"<Expression Column="State" Operator="equals"><String>Active</String></Expression>"#,
            "\n"
        ));
}

#[test]
fn xml_groups_mixed_operators() {
    assert_eq!(
        stdout(&[
            "query",
            "xml",
            "where [a] = 2 and [b] = 3 or [c] = 'x'"
        ]),
        concat!(
            r#"<Group GroupOperator="Or">"#,
            r#"<Group GroupOperator="And">"#,
            r#"<Expression Column="a" Operator="equals"><Number>2</Number></Expression>"#,
            r#"<Expression Column="b" Operator="equals"><Number>3</Number></Expression>"#,
            "</Group>",
            r#"<Expression Column="c" Operator="equals"><String>x</String></Expression>"#,
            "</Group>\n",
        )
    );
}

#[test]
fn xml_substitutes_parameters() {
    assert_eq!(
        stdout(&[
            "query",
            "xml",
            "[Owner] = @me and [Changed] >= @today and [Area] = @area",
            "--me",
            "bob",
            "--today",
            "2026-03-14",
            "-p",
            "area=Web",
        ]),
        concat!(
            r#"<Group GroupOperator="And">"#,
            r#"<Expression Column="Owner" Operator="equals"><String>bob</String></Expression>"#,
            r#"<Expression Column="Changed" Operator="greaterequals"><DateTime>2026-03-14T00:00:00Z</DateTime></Expression>"#,
            r#"<Expression Column="Area" Operator="equals"><String>Web</String></Expression>"#,
            "</Group>\n",
        )
    );
}

#[test]
fn me_defaults_to_owner() {
    assert_eq!(
        stdout(&["query", "xml", "[Owner] = @me"]),
        concat!(
            r#"<Expression Column="Owner" Operator="equals"><String>alice</String></Expression>"#,
            "\n"
        )
    );
}

#[test]
fn full_statement_uses_where_clause() {
    assert_eq!(
        stdout(&[
            "query",
            "xml",
            "select [Id], [Title] from WorkItems where [Id] > 10 order by [Id] desc",
        ]),
        concat!(
            r#"<Expression Column="Id" Operator="greater"><Number>10</Number></Expression>"#,
            "\n"
        )
    );
}

#[test]
fn optimize_removes_redundant_brackets() {
    assert_eq!(
        stdout(&["query", "optimize", "(([a] = 2) or ([b] = 3))"]),
        "( [a] = 2 Or [b] = 3 )\n"
    );
}

#[test]
fn explain_prints_each_stage() {
    let out = stdout(&["query", "explain", "[a] = 1 and [b] = 2 or [c] = 3"]);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "infix:     [a] = 1 And [b] = 2 Or [c] = 3");
    assert_eq!(lines[2], "prefix:    Or ( And [a] = 1 [b] = 2 ) [c] = 3");
}

#[test]
fn syntax_errors_fail() {
    tfs()
        .args(["query", "xml", "[State] = "])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: "));
}

#[test]
fn unknown_parameter_fails() {
    tfs()
        .args(["query", "xml", "[Area] = @area"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("@area"));
}

#[test]
fn malformed_param_fails() {
    tfs()
        .args(["query", "xml", "[Area] = @area", "-p", "area"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=VALUE"));
}
