//! Validation of decoded parameters into a typed request.
//!
//! The `url` allow-list is what keeps the gateway from being an open proxy:
//! no URL reaches the fetcher unless it came out of [`validate`].

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

/// Which upstream URLs the gateway may fetch.
#[derive(Debug, Clone)]
pub struct UpstreamPolicy {
    allowed_host: String,
}

impl UpstreamPolicy {
    pub fn new(allowed_host: impl Into<String>) -> Self {
        Self {
            allowed_host: allowed_host.into(),
        }
    }

    pub fn allowed_host(&self) -> &str {
        &self.allowed_host
    }
}

/// A validated `/api/parse` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseParams {
    url: Url,
    query: Option<String>,
}

impl ParseParams {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The path-query expression, if one was supplied and non-empty.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}

/// One failing check on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    Required,
    InvalidType,
    InvalidUrl,
    DisallowedHost,
}

/// Every issue found while validating a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    name: &'static str,
    issues: Vec<Issue>,
}

impl ValidationErrors {
    fn new(issues: Vec<Issue>) -> Self {
        Self {
            name: "ValidationError",
            issues,
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Names of the fields that failed, in order, without duplicates.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for issue in &self.issues {
            if let Some(field) = issue.path.first() {
                if !fields.contains(&field.as_str()) {
                    fields.push(field.as_str());
                }
            }
        }
        fields
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", issue.path.join("."), issue.message)?;
        }
        Ok(())
    }
}

fn issue(field: &str, code: IssueCode, message: impl Into<String>) -> Issue {
    Issue {
        code,
        path: vec![field.to_owned()],
        message: message.into(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_string<'a>(field: &str, value: &'a Value, issues: &mut Vec<Issue>) -> Option<&'a str> {
    match value {
        Value::String(s) => Some(s),
        other => {
            issues.push(issue(
                field,
                IssueCode::InvalidType,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

/// Validate a decoded record against the `/api/parse` shape.
///
/// Checks on a field keep running after one fails, so a URL that is both
/// malformed and off the allow-list reports both issues.
pub fn validate(
    record: &Map<String, Value>,
    policy: &UpstreamPolicy,
) -> Result<ParseParams, ValidationErrors> {
    let mut issues = Vec::new();

    let url = match record.get("url") {
        None => {
            issues.push(issue("url", IssueCode::Required, "Required"));
            None
        }
        Some(value) => expect_string("url", value, &mut issues).and_then(|raw| {
            let parsed = Url::parse(raw);
            if parsed.is_err() {
                issues.push(issue("url", IssueCode::InvalidUrl, "Invalid url"));
            }
            if !raw.contains(policy.allowed_host()) {
                issues.push(issue(
                    "url",
                    IssueCode::DisallowedHost,
                    format!("Invalid input: must include \"{}\"", policy.allowed_host()),
                ));
            }
            parsed.ok()
        }),
    };

    let query = match record.get("jq") {
        None => None,
        Some(value) => expect_string("jq", value, &mut issues).map(str::to_owned),
    };

    match url {
        Some(url) if issues.is_empty() => Ok(ParseParams { url, query }),
        _ => Err(ValidationErrors::new(issues)),
    }
}
