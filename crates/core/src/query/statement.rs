// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Full `SELECT ... FROM ... WHERE ... ORDER BY ...` statements.

use std::fmt;

use crate::error::Result;

use super::node::NodeList;
use super::parser::parse_tokens;
use super::token::{syntax, tokenize, Token, TokenKind};

/// One `ORDER BY` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub descending: bool,
}

/// A parsed work item query statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItemQuery {
    pub fields: Vec<String>,
    pub entity: String,
    /// Infix filter as written; empty when there is no WHERE clause.
    pub filter: NodeList,
    pub order_by: Vec<SortField>,
}

impl WorkItemQuery {
    /// Parses a statement. Keywords are case-insensitive.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens = tokenize(input)?;
        let mut pos = 0;

        expect_word(&tokens, &mut pos, "select", input.len())?;
        let fields = field_list(&tokens, &mut pos, input.len())?;
        expect_word(&tokens, &mut pos, "from", input.len())?;
        let entity = match tokens.get(pos) {
            Some(Token {
                kind: TokenKind::Word(name),
                ..
            }) => name.clone(),
            other => return Err(syntax(offset_of(other, input.len()), "expected an entity name")),
        };
        pos += 1;

        let order_start = tokens[pos..]
            .iter()
            .position(|t| is_word(t, "order"))
            .map(|i| pos + i)
            .unwrap_or(tokens.len());

        let filter = match tokens.get(pos) {
            Some(Token {
                kind: TokenKind::Where,
                offset,
            }) => {
                if order_start == pos + 1 {
                    return Err(syntax(*offset, "expected a condition after 'where'"));
                }
                let end_offset = tokens.get(order_start).map(|t| t.offset).unwrap_or(input.len());
                parse_tokens(&tokens[pos + 1..order_start], end_offset)?
            }
            Some(token) if pos < order_start => {
                return Err(syntax(token.offset, "expected 'where' or 'order by'"))
            }
            _ => NodeList::default(),
        };

        pos = order_start;
        let order_by = if pos < tokens.len() {
            pos += 1;
            expect_word(&tokens, &mut pos, "by", input.len())?;
            sort_list(&tokens, &mut pos, input.len())?
        } else {
            Vec::new()
        };

        if let Some(token) = tokens.get(pos) {
            return Err(syntax(token.offset, "unexpected text after query"));
        }

        Ok(WorkItemQuery {
            fields,
            entity,
            filter,
            order_by,
        })
    }
}

impl fmt::Display for WorkItemQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(|x| format!("[{x}]")).collect();
        write!(f, "SELECT {} FROM {}", fields.join(", "), self.entity)?;
        if !self.filter.is_empty() {
            write!(f, " WHERE {}", self.filter)?;
        }
        if !self.order_by.is_empty() {
            let keys: Vec<String> = self
                .order_by
                .iter()
                .map(|s| {
                    let dir = if s.descending { "DESC" } else { "ASC" };
                    format!("[{}] {dir}", s.field)
                })
                .collect();
            write!(f, " ORDER BY {}", keys.join(", "))?;
        }
        Ok(())
    }
}

fn is_word(token: &Token, word: &str) -> bool {
    matches!(&token.kind, TokenKind::Word(w) if w.eq_ignore_ascii_case(word))
}

fn offset_of(token: Option<&Token>, end: usize) -> usize {
    token.map(|t| t.offset).unwrap_or(end)
}

fn expect_word(tokens: &[Token], pos: &mut usize, word: &str, end: usize) -> Result<()> {
    match tokens.get(*pos) {
        Some(token) if is_word(token, word) => {
            *pos += 1;
            Ok(())
        }
        other => Err(syntax(offset_of(other, end), format!("expected '{word}'"))),
    }
}

fn field_list(tokens: &[Token], pos: &mut usize, end: usize) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    loop {
        match tokens.get(*pos) {
            Some(Token {
                kind: TokenKind::Field(name),
                ..
            }) => fields.push(name.clone()),
            other => return Err(syntax(offset_of(other, end), "expected '[field]'")),
        }
        *pos += 1;
        match tokens.get(*pos) {
            Some(Token {
                kind: TokenKind::Comma,
                ..
            }) => *pos += 1,
            _ => return Ok(fields),
        }
    }
}

fn sort_list(tokens: &[Token], pos: &mut usize, end: usize) -> Result<Vec<SortField>> {
    let mut keys = Vec::new();
    loop {
        let field = match tokens.get(*pos) {
            Some(Token {
                kind: TokenKind::Field(name),
                ..
            }) => name.clone(),
            other => return Err(syntax(offset_of(other, end), "expected '[field]' to sort by")),
        };
        *pos += 1;
        let mut descending = false;
        if let Some(token) = tokens.get(*pos) {
            if is_word(token, "desc") {
                descending = true;
                *pos += 1;
            } else if is_word(token, "asc") {
                *pos += 1;
            }
        }
        keys.push(SortField { field, descending });
        match tokens.get(*pos) {
            Some(Token {
                kind: TokenKind::Comma,
                ..
            }) => *pos += 1,
            _ => return Ok(keys),
        }
    }
}

#[cfg(test)]
#[path = "statement_tests.rs"]
mod tests;
