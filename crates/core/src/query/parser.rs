// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parser for WHERE-clause expressions.
//!
//! Parses text like `where ([State] = 'Active') and [Id] In (1, 2)` into a
//! flat infix [`NodeList`], validating structure as it goes.

use std::str::FromStr;

use crate::error::{Error, Result};

use super::node::{BoolOp, CompareOp, Condition, NodeList, QueryNode, QueryValue};
use super::token::{syntax, tokenize, Token, TokenKind};

/// Parse a WHERE clause. An optional leading `where` is accepted and an
/// empty clause yields an empty list.
///
/// # Errors
///
/// Returns [`Error::QuerySyntax`] with the byte offset of the problem.
pub fn parse_where(input: &str) -> Result<NodeList> {
    let tokens = tokenize(input)?;
    let tokens = match tokens.first() {
        Some(Token {
            kind: TokenKind::Where,
            ..
        }) => &tokens[1..],
        _ => &tokens[..],
    };
    parse_tokens(tokens, input.len())
}

impl FromStr for NodeList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_where(s)
    }
}

/// Parse an already tokenized expression. `end_offset` is reported when
/// the input ends too early.
pub(crate) fn parse_tokens(tokens: &[Token], end_offset: usize) -> Result<NodeList> {
    if tokens.is_empty() {
        return Ok(NodeList::default());
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end_offset,
        nodes: Vec::new(),
    };
    parser.expression()?;
    if let Some(token) = parser.peek() {
        let message = match token.kind {
            TokenKind::Close => "unbalanced ')'".to_string(),
            _ => "expected 'And' or 'Or' between conditions".to_string(),
        };
        return Err(syntax(token.offset, message));
    }
    Ok(NodeList::new(parser.nodes))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    end_offset: usize,
    nodes: Vec<QueryNode>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.peek().map(|t| t.offset).unwrap_or(self.end_offset)
    }

    /// expression := term (connector term)*
    fn expression(&mut self) -> Result<()> {
        self.term()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::And) => BoolOp::And,
                Some(TokenKind::Or) => BoolOp::Or,
                _ => return Ok(()),
            };
            let offset = self.offset();
            self.pos += 1;
            if self.peek().is_none() {
                return Err(syntax(
                    offset,
                    format!("dangling '{op}', expected a condition after it"),
                ));
            }
            self.nodes.push(QueryNode::Operator(op));
            self.term()?;
        }
    }

    /// term := '(' expression ')' | condition
    fn term(&mut self) -> Result<()> {
        let offset = self.offset();
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Open) => {
                self.pos += 1;
                self.nodes.push(QueryNode::OpenBracket);
                self.expression()?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::Close,
                        ..
                    }) => {
                        self.nodes.push(QueryNode::CloseBracket);
                        Ok(())
                    }
                    Some(token) => Err(syntax(
                        token.offset,
                        "expected 'And' or 'Or' between conditions",
                    )),
                    None => Err(syntax(offset, "unbalanced '(', expected ')'")),
                }
            }
            Some(TokenKind::Field(_)) => self.condition(),
            Some(TokenKind::And | TokenKind::Or) => {
                Err(syntax(offset, "dangling connector, expected a condition"))
            }
            Some(TokenKind::Close) => Err(syntax(offset, "expected a condition before ')'")),
            Some(_) => Err(syntax(offset, "expected '[field]' or '('")),
            None => Err(syntax(offset, "expected a condition")),
        }
    }

    /// condition := field op value
    fn condition(&mut self) -> Result<()> {
        let field = match self.next().map(|t| &t.kind) {
            Some(TokenKind::Field(name)) => name.clone(),
            _ => return Err(syntax(self.offset(), "expected '[field]'")),
        };
        let offset = self.offset();
        let op = match self.next().map(|t| &t.kind) {
            Some(TokenKind::Op(op)) => *op,
            _ => {
                return Err(syntax(
                    offset,
                    format!(
                        "expected an operator after [{field}], one of {}",
                        CompareOp::valid_symbols()
                    ),
                ))
            }
        };
        let value = if matches!(op, CompareOp::In | CompareOp::NotIn)
            && matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Open))
        {
            self.value_list()?
        } else {
            self.value(&format!("[{field}] {op}"))?
        };
        self.nodes
            .push(QueryNode::Condition(Condition { field, op, value }));
        Ok(())
    }

    fn value(&mut self, after: &str) -> Result<QueryValue> {
        let offset = self.offset();
        let value = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Str(s)) => QueryValue::String(s.clone()),
            Some(TokenKind::Number(n)) => QueryValue::Number(n.clone()),
            Some(TokenKind::Date(d)) => QueryValue::Date(*d),
            Some(TokenKind::Param(p)) => QueryValue::Parameter(p.clone()),
            _ => {
                return Err(syntax(
                    offset,
                    format!("missing operand after {after}"),
                ))
            }
        };
        self.pos += 1;
        Ok(value)
    }

    fn value_list(&mut self) -> Result<QueryValue> {
        let open = self.offset();
        self.pos += 1;
        let mut values = Vec::new();
        loop {
            values.push(self.value("'(' or ','")?);
            match self.next().map(|t| &t.kind) {
                Some(TokenKind::Comma) => continue,
                Some(TokenKind::Close) => break,
                _ => return Err(syntax(open, "unterminated value list, expected ')'")),
            }
        }
        Ok(QueryValue::List(values))
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
