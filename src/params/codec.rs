//! Query-string decoding with best-effort typing.
//!
//! Callers send loosely-typed parameters (`?limit=42&debug=true&url=...`).
//! Each value is tried as JSON first and kept verbatim when that fails, so a
//! value can never fail the request just by not being structured data.

use serde_json::{Map, Value};

/// A single decoded query-string value.
#[derive(Debug, Clone, PartialEq)]
pub enum LooseValue {
    /// The text was valid JSON.
    Parsed(Value),
    /// The text was kept as-is.
    Raw(String),
}

impl LooseValue {
    pub fn into_json(self) -> Value {
        match self {
            LooseValue::Parsed(value) => value,
            LooseValue::Raw(text) => Value::String(text),
        }
    }
}

/// Interpret `text` as JSON, falling back to the original string.
pub fn lenient_parse(text: &str) -> LooseValue {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => LooseValue::Parsed(value),
        Err(_) => LooseValue::Raw(text.to_owned()),
    }
}

/// Decode a raw query string (without the leading `?`) into a record.
///
/// Keys that repeat bind to an array of their values in order of appearance;
/// keys that appear once bind to their single value.
pub fn decode_query(raw: &str) -> Map<String, Value> {
    let mut grouped: Vec<(String, Vec<Value>)> = Vec::new();

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        let value = lenient_parse(&value).into_json();
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key.into_owned(), vec![value])),
        }
    }

    grouped
        .into_iter()
        .map(|(key, mut values)| {
            let bound = if values.len() == 1 {
                values.remove(0)
            } else {
                Value::Array(values)
            };
            (key, bound)
        })
        .collect()
}
