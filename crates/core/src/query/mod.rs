// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Work item query expressions.
//!
//! A WHERE clause is parsed into a flat infix [`NodeList`], simplified,
//! rewritten into prefix form and serialized to the XML the server
//! understands.
//!
//! # Syntax
//!
//! ```text
//! [Field] op value  (And|Or  [Field] op value)*
//! ```
//!
//! - Operators: `=`, `<>`, `!=`, `<`, `>`, `<=`, `>=`, `In`, `Contains`,
//!   `Under`, and `Not` before the last three
//! - Values: `'string'`, `42`, `2024-01-01`, `@param`, `(v1, v2)` for `In`
//! - Parentheses group conditions
//!
//! # Examples
//!
//! ```text
//! where [State] = 'Active' and [Assigned To] = @me
//! ([Priority] <= 2 or [Severity] = 'High') and [Area Path] Under 'Web'
//! [Id] In (1, 2, 3)
//! ```

mod node;
mod parser;
mod statement;
mod token;
mod xml;

pub use node::{BoolOp, CompareOp, Condition, NodeList, QueryNode, QueryValue};
pub use parser::parse_where;
pub use statement::{SortField, WorkItemQuery};
pub use token::{tokenize, Token, TokenKind};
pub use xml::{escape, QueryParameters};

use crate::error::Result;

/// Parses, simplifies and serializes a WHERE clause in one step.
pub fn where_to_xml(input: &str, params: &QueryParameters) -> Result<String> {
    let mut nodes = parse_where(input)?;
    nodes.optimize();
    nodes.extract_operator_forward()?.write_xml(params)
}
