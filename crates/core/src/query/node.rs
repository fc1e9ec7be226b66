// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Flat node lists and the rewrites applied to them before serialization.
//!
//! The parser produces an infix list such as `( [a] = 2 ) And [b] = 3`.
//! [`NodeList::optimize`] strips redundant brackets and
//! [`NodeList::extract_operator_forward`] turns the infix list into prefix
//! form (`And [a] = 2 [b] = 3`) where every group names its operator first.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
    In,
    NotIn,
    Contains,
    NotContains,
    Under,
    NotUnder,
}

impl CompareOp {
    /// Query-text form of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Equals => "=",
            CompareOp::NotEquals => "<>",
            CompareOp::Less => "<",
            CompareOp::Greater => ">",
            CompareOp::LessEquals => "<=",
            CompareOp::GreaterEquals => ">=",
            CompareOp::In => "In",
            CompareOp::NotIn => "Not In",
            CompareOp::Contains => "Contains",
            CompareOp::NotContains => "Not Contains",
            CompareOp::Under => "Under",
            CompareOp::NotUnder => "Not Under",
        }
    }

    /// Operator name used in the XML `Operator` attribute.
    ///
    /// `In` and `Not In` expand into groups and report the name of their
    /// per-value comparison.
    pub fn xml_name(&self) -> &'static str {
        match self {
            CompareOp::Equals | CompareOp::In => "equals",
            CompareOp::NotEquals | CompareOp::NotIn => "notequals",
            CompareOp::Less => "less",
            CompareOp::Greater => "greater",
            CompareOp::LessEquals => "lessequals",
            CompareOp::GreaterEquals => "greaterequals",
            CompareOp::Contains => "contains",
            CompareOp::NotContains => "notcontains",
            CompareOp::Under => "under",
            CompareOp::NotUnder => "notunder",
        }
    }

    /// Returns valid operator spellings for error messages.
    pub fn valid_symbols() -> &'static str {
        "=, <>, !=, <, >, <=, >=, In, Not In, Contains, Not Contains, Under, Not Under"
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean connector between conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "And",
            BoolOp::Or => "Or",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    String(String),
    /// Number as written in the query.
    Number(String),
    Date(NaiveDate),
    /// Unresolved `@name` parameter.
    Parameter(String),
    /// Value list of `In` / `Not In`.
    List(Vec<QueryValue>),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            QueryValue::Number(n) => f.write_str(n),
            QueryValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            QueryValue::Parameter(p) => write!(f, "@{p}"),
            QueryValue::List(values) => {
                f.write_str("(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// A single `[field] op value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
    pub value: QueryValue,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.field, self.op, self.value)
    }
}

/// One element of a flat expression list.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Condition(Condition),
    Operator(BoolOp),
    OpenBracket,
    CloseBracket,
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Condition(c) => write!(f, "{c}"),
            QueryNode::Operator(op) => write!(f, "{op}"),
            QueryNode::OpenBracket => f.write_str("("),
            QueryNode::CloseBracket => f.write_str(")"),
        }
    }
}

/// Flat sequence of query nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeList {
    nodes: Vec<QueryNode>,
}

impl NodeList {
    pub fn new(nodes: Vec<QueryNode>) -> Self {
        NodeList { nodes }
    }

    pub fn nodes(&self) -> &[QueryNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of condition nodes in the list.
    pub fn condition_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, QueryNode::Condition(_)))
            .count()
    }

    /// Removes brackets that wrap a single condition or a single bracketed
    /// group, repeating until nothing changes.
    pub fn optimize(&mut self) {
        while self.collapse_once() {}
    }

    fn collapse_once(&mut self) -> bool {
        for i in 0..self.nodes.len() {
            if self.nodes[i] != QueryNode::OpenBracket {
                continue;
            }
            let Some(close) = matching_close(&self.nodes, i) else {
                continue;
            };
            let single_condition =
                close == i + 2 && matches!(self.nodes[i + 1], QueryNode::Condition(_));
            let single_group = self.nodes[i + 1] == QueryNode::OpenBracket
                && matching_close(&self.nodes, i + 1) == Some(close - 1);
            if single_condition || single_group {
                self.nodes.remove(close);
                self.nodes.remove(i);
                return true;
            }
        }
        false
    }

    /// Returns the contents of the bracketed group opening at `index`.
    pub fn get_sub_list(&self, index: usize) -> Result<NodeList> {
        match self.nodes.get(index) {
            Some(QueryNode::OpenBracket) => {}
            Some(node) => {
                return Err(Error::InvalidNodeOrder(format!(
                    "expected '(' at node {index}, found '{node}'"
                )))
            }
            None => {
                return Err(Error::InvalidNodeOrder(format!(
                    "node {index} is out of range for a list of {}",
                    self.nodes.len()
                )))
            }
        }
        let close = matching_close(&self.nodes, index).ok_or_else(|| {
            Error::InvalidNodeOrder(format!("bracket at node {index} is never closed"))
        })?;
        Ok(NodeList::new(self.nodes[index + 1..close].to_vec()))
    }

    /// Rewrites an infix list into prefix form.
    ///
    /// Runs of the same connector are folded left into one group; a
    /// differing connector wraps everything so far as its first operand.
    /// `a And b And c Or d` becomes `Or ( And a b c ) d`. Bracketed
    /// subgroups are rewritten recursively and single-condition groups
    /// are inlined.
    pub fn extract_operator_forward(&self) -> Result<NodeList> {
        Ok(NodeList::new(extract(&self.nodes)?))
    }
}

impl fmt::Display for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

/// Index of the bracket closing the one opened at `open`.
pub(crate) fn matching_close(nodes: &[QueryNode], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, node) in nodes.iter().enumerate().skip(open) {
        match node {
            QueryNode::OpenBracket => depth += 1,
            QueryNode::CloseBracket => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn extract(nodes: &[QueryNode]) -> Result<Vec<QueryNode>> {
    let mut operands: Vec<Vec<QueryNode>> = Vec::new();
    let mut connectors: Vec<BoolOp> = Vec::new();
    let mut i = 0;

    while i < nodes.len() {
        let expect_operand = operands.len() == connectors.len();
        match &nodes[i] {
            QueryNode::Condition(_) if expect_operand => {
                operands.push(vec![nodes[i].clone()]);
                i += 1;
            }
            QueryNode::OpenBracket if expect_operand => {
                let close = matching_close(nodes, i).ok_or_else(|| {
                    Error::InvalidNodeOrder(format!("bracket at node {i} is never closed"))
                })?;
                operands.push(extract(&nodes[i + 1..close])?);
                i = close + 1;
            }
            QueryNode::Operator(op) if !expect_operand => {
                connectors.push(*op);
                i += 1;
            }
            node => {
                return Err(Error::InvalidNodeOrder(format!(
                    "unexpected '{node}' at node {i}"
                )))
            }
        }
    }

    if operands.len() == connectors.len() {
        return Err(Error::InvalidNodeOrder(
            "expression ends without an operand".to_string(),
        ));
    }

    let mut operands = operands.into_iter();
    let mut group = operands.next().unwrap_or_default();
    let mut current: Option<(BoolOp, Vec<Vec<QueryNode>>)> = None;

    for (op, operand) in connectors.into_iter().zip(operands) {
        current = Some(match current.take() {
            Some((run_op, mut members)) if run_op == op => {
                members.push(operand);
                (run_op, members)
            }
            Some((run_op, members)) => (op, vec![prefix_group(run_op, members), operand]),
            None => (op, vec![std::mem::take(&mut group), operand]),
        });
    }

    Ok(match current {
        Some((op, members)) => prefix_group(op, members),
        None => group,
    })
}

fn prefix_group(op: BoolOp, members: Vec<Vec<QueryNode>>) -> Vec<QueryNode> {
    let mut out = vec![QueryNode::Operator(op)];
    for member in members {
        if member.len() == 1 {
            out.extend(member);
        } else {
            out.push(QueryNode::OpenBracket);
            out.extend(member);
            out.push(QueryNode::CloseBracket);
        }
    }
    out
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
