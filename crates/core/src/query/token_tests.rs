// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn tokenizes_simple_condition() {
    assert_eq!(
        kinds("[State] = 'Active'"),
        vec![
            TokenKind::Field("State".into()),
            TokenKind::Op(CompareOp::Equals),
            TokenKind::Str("Active".into()),
        ]
    );
}

#[test]
fn records_byte_offsets() {
    let tokens = tokenize("where [a] = 2").unwrap();
    let offsets: Vec<_> = tokens.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![0, 6, 10, 12]);
}

#[parameterized(
    equals = { "=", CompareOp::Equals },
    not_equals = { "<>", CompareOp::NotEquals },
    bang_equals = { "!=", CompareOp::NotEquals },
    less = { "<", CompareOp::Less },
    greater = { ">", CompareOp::Greater },
    less_equals = { "<=", CompareOp::LessEquals },
    greater_equals = { ">=", CompareOp::GreaterEquals },
    in_lower = { "in", CompareOp::In },
    contains_mixed = { "CoNtAiNs", CompareOp::Contains },
    under = { "Under", CompareOp::Under },
    not_in = { "Not In", CompareOp::NotIn },
    not_contains = { "not  contains", CompareOp::NotContains },
    not_under = { "NOT UNDER", CompareOp::NotUnder },
)]
fn tokenizes_operators(text: &str, op: CompareOp) {
    assert_eq!(
        kinds(&format!("[f] {text} 1")),
        vec![
            TokenKind::Field("f".into()),
            TokenKind::Op(op),
            TokenKind::Number("1".into()),
        ]
    );
}

#[parameterized(
    and = { "AND", TokenKind::And },
    or = { "or", TokenKind::Or },
    where_kw = { "Where", TokenKind::Where },
    open = { "(", TokenKind::Open },
    close = { ")", TokenKind::Close },
    comma = { ",", TokenKind::Comma },
    param = { "@me", TokenKind::Param("me".into()) },
    word = { "WorkItems", TokenKind::Word("WorkItems".into()) },
)]
fn tokenizes_single_tokens(text: &str, kind: TokenKind) {
    assert_eq!(kinds(text), vec![kind]);
}

#[test]
fn string_escapes_doubled_quotes() {
    assert_eq!(kinds("'it''s'"), vec![TokenKind::Str("it's".into())]);
    assert_eq!(kinds(r#""say ""hi""""#), vec![TokenKind::Str(r#"say "hi""#.into())]);
}

#[test]
fn numbers_and_dates() {
    assert_eq!(
        kinds("42 -3 1.5 2024-01-31"),
        vec![
            TokenKind::Number("42".into()),
            TokenKind::Number("-3".into()),
            TokenKind::Number("1.5".into()),
            TokenKind::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
        ]
    );
}

#[test]
fn field_names_keep_inner_spaces() {
    assert_eq!(
        kinds("[Assigned To]"),
        vec![TokenKind::Field("Assigned To".into())]
    );
}

#[parameterized(
    unterminated_string = { "[a] = 'open", 6 },
    unterminated_field = { "[a = 1", 0 },
    empty_field = { "[ ] = 1", 0 },
    bare_not = { "[a] not 1", 4 },
    bad_char = { "[a] = #", 6 },
    bad_number = { "[a] = 1-2-3", 6 },
    empty_param = { "[a] = @", 6 },
)]
fn reports_syntax_errors_with_offset(input: &str, expected: usize) {
    match tokenize(input) {
        Err(crate::error::Error::QuerySyntax { offset, .. }) => assert_eq!(offset, expected),
        other => panic!("expected syntax error, got {other:?}"),
    }
}
