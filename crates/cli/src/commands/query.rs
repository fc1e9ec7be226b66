// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline work item query tools.

use chrono::NaiveDate;
use tfsync_core::identity;
use tfsync_core::query::{parse_where, QueryValue, WorkItemQuery};
use tfsync_core::{NodeList, QueryParameters};

use crate::cli::QueryCommand;
use crate::error::{Error, Result};

pub fn run(command: QueryCommand) -> Result<()> {
    match command {
        QueryCommand::Xml {
            query,
            me,
            today,
            params,
        } => {
            let params = parameters(me, today.as_deref(), &params)?;
            println!("{}", to_xml(&query, &params)?);
        }
        QueryCommand::Optimize { query } => {
            let mut nodes = filter(&query)?;
            nodes.optimize();
            println!("{}", nodes);
        }
        QueryCommand::Explain { query } => {
            let params = parameters(None, None, &[])?;
            for line in explain(&query, &params)? {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// The WHERE filter of a bare clause or of a full SELECT statement.
pub(crate) fn filter(query: &str) -> Result<NodeList> {
    if is_statement(query) {
        return Ok(WorkItemQuery::parse(query)?.filter);
    }
    Ok(parse_where(query)?)
}

fn is_statement(query: &str) -> bool {
    query
        .split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("select"))
}

pub(crate) fn to_xml(query: &str, params: &QueryParameters) -> Result<String> {
    let mut nodes = filter(query)?;
    nodes.optimize();
    Ok(nodes.extract_operator_forward()?.write_xml(params)?)
}

/// Every stage of the conversion, one per line.
pub(crate) fn explain(query: &str, params: &QueryParameters) -> Result<Vec<String>> {
    let infix = filter(query)?;
    let mut optimized = infix.clone();
    optimized.optimize();
    let prefix = optimized.extract_operator_forward()?;
    let xml = prefix.write_xml(params)?;
    Ok(vec![
        format!("infix:     {}", infix),
        format!("optimized: {}", optimized),
        format!("prefix:    {}", prefix),
        format!("xml:       {}", xml),
    ])
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn parameters(
    me: Option<String>,
    today: Option<&str>,
    extra: &[String],
) -> Result<QueryParameters> {
    let me = me.unwrap_or_else(identity::default_owner);
    let mut params = match today {
        Some(day) => QueryParameters::new(me, parse_date(day)?),
        None => QueryParameters::for_user(me),
    };
    for assignment in extra {
        let (name, value) = parse_assignment(assignment)?;
        params.set(&name, value);
    }
    Ok(params)
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        Error::InvalidInput(format!(
            "invalid date: '{}'\n  hint: use YYYY-MM-DD",
            value
        ))
    })
}

/// Parses `NAME=VALUE`. Numbers and `YYYY-MM-DD` dates keep their type;
/// anything else is a string, with optional surrounding quotes removed.
pub(crate) fn parse_assignment(assignment: &str) -> Result<(String, QueryValue)> {
    let (name, value) = assignment.split_once('=').ok_or_else(|| {
        Error::InvalidInput(format!(
            "invalid parameter: '{}'\n  hint: use NAME=VALUE",
            assignment
        ))
    })?;
    let name = name.trim().trim_start_matches('@');
    if name.is_empty() {
        return Err(Error::InvalidInput(format!(
            "invalid parameter: '{}'\n  hint: the name is empty",
            assignment
        )));
    }

    let value = value.trim();
    let parsed = if value.parse::<f64>().is_ok() {
        QueryValue::Number(value.to_string())
    } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        QueryValue::Date(date)
    } else {
        let unquoted = value
            .strip_prefix('\'')
            .and_then(|v| v.strip_suffix('\''))
            .unwrap_or(value);
        QueryValue::String(unquoted.to_string())
    };
    Ok((name.to_string(), parsed))
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
