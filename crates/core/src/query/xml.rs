// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! XML serialization of node lists.
//!
//! Produces the compact form the server accepts:
//!
//! ```text
//! <Group GroupOperator="And">
//!   <Expression Column="State" Operator="equals"><String>Active</String></Expression>
//!   <Expression Column="Id" Operator="greater"><Number>10</Number></Expression>
//! </Group>
//! ```
//!
//! Whitespace is shown for readability only; the writer emits no
//! indentation.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{Error, Result};

use super::node::{matching_close, BoolOp, CompareOp, Condition, NodeList, QueryNode, QueryValue};

/// Values substituted for `@name` parameters during serialization.
///
/// Names are matched case-insensitively. `@me` and `@today` are always
/// defined.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    values: HashMap<String, QueryValue>,
}

impl QueryParameters {
    /// Creates the predefined set for a user and a calendar day.
    pub fn new(me: impl Into<String>, today: NaiveDate) -> Self {
        let mut values = HashMap::new();
        values.insert("me".to_string(), QueryValue::String(me.into()));
        values.insert("today".to_string(), QueryValue::Date(today));
        QueryParameters { values }
    }

    /// Predefined set with `@today` taken from the local clock.
    pub fn for_user(me: impl Into<String>) -> Self {
        Self::new(me, chrono::Local::now().date_naive())
    }

    /// Defines or replaces a parameter.
    pub fn set(&mut self, name: &str, value: QueryValue) {
        self.values.insert(name.to_lowercase(), value);
    }

    pub fn resolve(&self, name: &str) -> Result<&QueryValue> {
        self.values
            .get(&name.to_lowercase())
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }
}

impl NodeList {
    /// Serializes the list to XML.
    ///
    /// Accepts a single condition, an infix list starting with a condition
    /// (rewritten to prefix form first) or a prefix list starting with an
    /// operator. Any other multi-node list fails with
    /// [`Error::InvalidNodeOrder`].
    pub fn write_xml(&self, params: &QueryParameters) -> Result<String> {
        let mut out = String::new();
        match self.nodes() {
            [] => {}
            [QueryNode::Condition(condition)] => write_condition(&mut out, condition, params)?,
            [QueryNode::Operator(_), ..] => {
                let end = write_group(&mut out, self.nodes(), 0, params)?;
                if end != self.len() {
                    return Err(Error::InvalidNodeOrder(format!(
                        "unexpected '{}' after the top-level group",
                        self.nodes()[end]
                    )));
                }
            }
            [QueryNode::Condition(_), ..] => {
                return self.extract_operator_forward()?.write_xml(params);
            }
            [first, ..] => {
                return Err(Error::InvalidNodeOrder(format!(
                    "a list of {} nodes must start with an operator, found '{first}'",
                    self.len()
                )))
            }
        }
        Ok(out)
    }
}

/// Writes the prefix group whose operator sits at `start`; returns the
/// index after its last operand.
fn write_group(
    out: &mut String,
    nodes: &[QueryNode],
    start: usize,
    params: &QueryParameters,
) -> Result<usize> {
    let op = match nodes.get(start) {
        Some(QueryNode::Operator(op)) => *op,
        other => {
            return Err(Error::InvalidNodeOrder(format!(
                "expected an operator at node {start}, found {}",
                describe(other)
            )))
        }
    };

    out.push_str(&format!(r#"<Group GroupOperator="{op}">"#));
    let mut i = start + 1;
    let mut operands = 0;
    while i < nodes.len() {
        match &nodes[i] {
            QueryNode::Condition(condition) => {
                write_condition(out, condition, params)?;
                i += 1;
            }
            QueryNode::OpenBracket => {
                let close = matching_close(nodes, i).ok_or_else(|| {
                    Error::InvalidNodeOrder(format!("bracket at node {i} is never closed"))
                })?;
                match &nodes[i + 1..close] {
                    [QueryNode::Condition(condition)] => write_condition(out, condition, params)?,
                    _ => {
                        let end = write_group(out, &nodes[..close], i + 1, params)?;
                        if end != close {
                            return Err(Error::InvalidNodeOrder(format!(
                                "unexpected '{}' inside group at node {i}",
                                nodes[end]
                            )));
                        }
                    }
                }
                i = close + 1;
            }
            QueryNode::CloseBracket => break,
            QueryNode::Operator(_) => {
                return Err(Error::InvalidNodeOrder(format!(
                    "operator at node {i} must open a bracketed group"
                )))
            }
        }
        operands += 1;
    }
    if operands < 2 {
        return Err(Error::InvalidNodeOrder(format!(
            "'{op}' at node {start} needs at least two operands"
        )));
    }
    out.push_str("</Group>");
    Ok(i)
}

fn write_condition(out: &mut String, condition: &Condition, params: &QueryParameters) -> Result<()> {
    match (&condition.op, &condition.value) {
        (CompareOp::In | CompareOp::NotIn, QueryValue::List(values)) if values.len() > 1 => {
            let group_op = if condition.op == CompareOp::In {
                BoolOp::Or
            } else {
                BoolOp::And
            };
            out.push_str(&format!(r#"<Group GroupOperator="{group_op}">"#));
            for value in values {
                write_expression(out, &condition.field, condition.op, value, params)?;
            }
            out.push_str("</Group>");
            Ok(())
        }
        (_, QueryValue::List(values)) => match values.as_slice() {
            [single] => write_expression(out, &condition.field, condition.op, single, params),
            _ => Err(Error::InvalidNodeOrder(format!(
                "'{}' does not take a value list",
                condition.op
            ))),
        },
        (_, value) => write_expression(out, &condition.field, condition.op, value, params),
    }
}

fn write_expression(
    out: &mut String,
    field: &str,
    op: CompareOp,
    value: &QueryValue,
    params: &QueryParameters,
) -> Result<()> {
    out.push_str(&format!(
        r#"<Expression Column="{}" Operator="{}">"#,
        escape(field),
        op.xml_name()
    ));
    write_value(out, value, params)?;
    out.push_str("</Expression>");
    Ok(())
}

fn write_value(out: &mut String, value: &QueryValue, params: &QueryParameters) -> Result<()> {
    match value {
        QueryValue::String(s) => out.push_str(&format!("<String>{}</String>", escape(s))),
        QueryValue::Number(n) => out.push_str(&format!("<Number>{}</Number>", escape(n))),
        QueryValue::Date(d) => out.push_str(&format!(
            "<DateTime>{}T00:00:00Z</DateTime>",
            d.format("%Y-%m-%d")
        )),
        QueryValue::Parameter(name) => match params.resolve(name)? {
            QueryValue::Parameter(_) | QueryValue::List(_) => {
                return Err(Error::UnknownParameter(name.clone()))
            }
            resolved => write_value(out, resolved, params)?,
        },
        QueryValue::List(_) => {
            return Err(Error::InvalidNodeOrder(
                "value lists are only valid with 'In'".to_string(),
            ))
        }
    }
    Ok(())
}

fn describe(node: Option<&QueryNode>) -> String {
    match node {
        Some(node) => format!("'{node}'"),
        None => "end of list".to_string(),
    }
}

/// Escapes text for use in element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "xml_tests.rs"]
mod tests;
