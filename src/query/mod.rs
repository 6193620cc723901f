//! JSONPath projection over parsed feed documents.
//!
//! # Responsibilities
//! - Evaluate a caller-supplied JSONPath (RFC 9535) expression
//! - Shape the matched nodes into a single JSON value
//! - Contain malformed expressions instead of failing the request
//!
//! # Design Decisions
//! - Evaluation never returns `Err`; callers inspect a [`Projection`]
//! - A singular path (`$.items[0].title`) that hits yields the bare value
//! - Everything else yields an array of matches, possibly empty

use serde_json::Value;
use serde_json_path::JsonPath;
use thiserror::Error;

/// A malformed query expression. Never terminal for a request.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid query `{expression}`: {reason}")]
pub struct QueryError {
    pub expression: String,
    pub reason: String,
}

/// Outcome of evaluating a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// At least one node matched; already shaped for the response.
    Matched(Value),
    /// The expression was valid but selected nothing.
    Empty,
    /// The expression could not be parsed.
    Contained(QueryError),
}

impl Projection {
    /// Collapse into the response value. Empty and contained both become `[]`.
    pub fn into_value(self) -> Value {
        match self {
            Projection::Matched(value) => value,
            Projection::Empty => Value::Array(Vec::new()),
            Projection::Contained(err) => {
                tracing::debug!(error = %err, "Query failed to parse, returning empty result");
                Value::Array(Vec::new())
            }
        }
    }
}

/// Evaluate `expression` against `document`.
pub fn project(expression: &str, document: &Value) -> Projection {
    let path = match JsonPath::parse(expression) {
        Ok(path) => path,
        Err(e) => {
            return Projection::Contained(QueryError {
                expression: expression.to_owned(),
                reason: e.to_string(),
            })
        }
    };

    let nodes = path.query(document).all();
    if nodes.is_empty() {
        return Projection::Empty;
    }

    if nodes.len() == 1 && is_singular(expression) {
        return Projection::Matched(nodes[0].clone());
    }

    Projection::Matched(Value::Array(nodes.into_iter().cloned().collect()))
}

/// True when the expression can select at most one node: only name and
/// index selectors, no wildcard, descendant, filter, slice, or union.
fn is_singular(expression: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev = '\0';

    for c in expression.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '*' | '?' | ':' | ',' => return false,
            '.' if prev == '.' => return false,
            _ => {}
        }
        prev = c;
    }
    true
}
