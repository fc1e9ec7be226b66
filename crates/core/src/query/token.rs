// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tokenizer for work item query text.

use chrono::NaiveDate;

use crate::error::{Error, Result};

use super::node::CompareOp;

/// Lexical category of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `[Field Name]`, stored without brackets.
    Field(String),
    Op(CompareOp),
    /// Quoted string constant, with quotes removed and escapes resolved.
    Str(String),
    /// Numeric constant, kept as written.
    Number(String),
    /// Unquoted `YYYY-MM-DD` date constant.
    Date(NaiveDate),
    /// `@name`, stored without the `@`.
    Param(String),
    And,
    Or,
    Where,
    Open,
    Close,
    Comma,
    /// Any other bare identifier (`select`, `from`, entity names...).
    Word(String),
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Splits query text into tokens.
///
/// Keywords are matched case-insensitively. `Not` must be followed by
/// `In`, `Contains` or `Under`.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let kind = match c {
            b'(' => {
                pos += 1;
                TokenKind::Open
            }
            b')' => {
                pos += 1;
                TokenKind::Close
            }
            b',' => {
                pos += 1;
                TokenKind::Comma
            }
            b'[' => {
                let (name, next) = read_field(input, pos)?;
                pos = next;
                TokenKind::Field(name)
            }
            b'\'' | b'"' => {
                let (text, next) = read_string(input, pos)?;
                pos = next;
                TokenKind::Str(text)
            }
            b'@' => {
                let end = scan_word(bytes, pos + 1);
                if end == pos + 1 {
                    return Err(syntax(pos, "expected parameter name after '@'"));
                }
                let name = input[pos + 1..end].to_string();
                pos = end;
                TokenKind::Param(name)
            }
            b'=' | b'<' | b'>' | b'!' => {
                let (op, next) = read_symbol(bytes, pos)?;
                pos = next;
                TokenKind::Op(op)
            }
            b'-' | b'0'..=b'9' => {
                let (kind, next) = read_number_or_date(input, pos)?;
                pos = next;
                kind
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let end = scan_word(bytes, pos);
                let word = &input[pos..end];
                pos = end;
                match word.to_ascii_lowercase().as_str() {
                    "not" => {
                        let (op, next) = read_negated(input, pos, start)?;
                        pos = next;
                        TokenKind::Op(op)
                    }
                    lower => keyword(lower).unwrap_or_else(|| TokenKind::Word(word.to_string())),
                }
            }
            _ => {
                let ch = input[pos..].chars().next().unwrap_or('?');
                return Err(syntax(pos, format!("unexpected character '{ch}'")));
            }
        };
        tokens.push(Token {
            kind,
            offset: start,
        });
    }

    Ok(tokens)
}

pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Error {
    Error::QuerySyntax {
        offset,
        message: message.into(),
    }
}

fn keyword(lower: &str) -> Option<TokenKind> {
    let kind = match lower {
        "where" => TokenKind::Where,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "in" => TokenKind::Op(CompareOp::In),
        "contains" => TokenKind::Op(CompareOp::Contains),
        "under" => TokenKind::Op(CompareOp::Under),
        _ => return None,
    };
    Some(kind)
}

fn scan_word(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || matches!(bytes[pos], b'_' | b'.'))
    {
        pos += 1;
    }
    pos
}

fn read_field(input: &str, start: usize) -> Result<(String, usize)> {
    let rest = &input[start + 1..];
    let Some(close) = rest.find(']') else {
        return Err(syntax(start, "unterminated field name, expected ']'"));
    };
    let name = rest[..close].trim();
    if name.is_empty() {
        return Err(syntax(start, "empty field name"));
    }
    Ok((name.to_string(), start + 1 + close + 1))
}

fn read_string(input: &str, start: usize) -> Result<(String, usize)> {
    let bytes = input.as_bytes();
    let quote = bytes[start];
    let mut text = String::new();
    let mut pos = start + 1;
    let mut run = pos;

    while pos < bytes.len() {
        if bytes[pos] == quote {
            text.push_str(&input[run..pos]);
            // Doubled quote is an escaped quote
            if bytes.get(pos + 1) == Some(&quote) {
                text.push(quote as char);
                pos += 2;
                run = pos;
                continue;
            }
            return Ok((text, pos + 1));
        }
        pos += 1;
    }

    Err(syntax(start, "unterminated string constant"))
}

fn read_symbol(bytes: &[u8], start: usize) -> Result<(CompareOp, usize)> {
    let pair = (bytes[start], bytes.get(start + 1).copied());
    let (op, len) = match pair {
        (b'<', Some(b'>')) | (b'!', Some(b'=')) => (CompareOp::NotEquals, 2),
        (b'<', Some(b'=')) => (CompareOp::LessEquals, 2),
        (b'>', Some(b'=')) => (CompareOp::GreaterEquals, 2),
        (b'<', _) => (CompareOp::Less, 1),
        (b'>', _) => (CompareOp::Greater, 1),
        (b'=', _) => (CompareOp::Equals, 1),
        _ => {
            return Err(syntax(
                start,
                format!("unknown operator, expected one of {}", CompareOp::valid_symbols()),
            ))
        }
    };
    Ok((op, start + len))
}

fn read_number_or_date(input: &str, start: usize) -> Result<(TokenKind, usize)> {
    let bytes = input.as_bytes();
    let mut end = start + 1;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || matches!(bytes[end], b'.' | b'-'))
    {
        end += 1;
    }
    let text = &input[start..end];

    if text.len() == 10 && bytes[start + 4] == b'-' && bytes[start + 7] == b'-' {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Ok((TokenKind::Date(date), end));
        }
    }
    if text.parse::<f64>().is_err() {
        return Err(syntax(start, format!("invalid number '{text}'")));
    }
    Ok((TokenKind::Number(text.to_string()), end))
}

fn read_negated(input: &str, pos: usize, not_offset: usize) -> Result<(CompareOp, usize)> {
    let bytes = input.as_bytes();
    let mut begin = pos;
    while begin < bytes.len() && bytes[begin].is_ascii_whitespace() {
        begin += 1;
    }
    let end = scan_word(bytes, begin);
    let op = match input[begin..end].to_ascii_lowercase().as_str() {
        "in" => CompareOp::NotIn,
        "contains" => CompareOp::NotContains,
        "under" => CompareOp::NotUnder,
        _ => {
            return Err(syntax(
                not_offset,
                "expected 'In', 'Contains' or 'Under' after 'Not'",
            ))
        }
    };
    Ok((op, end))
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
