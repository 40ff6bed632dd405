//! Extraction of JSON:API error lists from response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a JSON:API `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JsonApiError {
    pub code: String,
    pub title: String,
    pub status: u16,
}

/// Parses the `errors` array of a JSON:API document.
///
/// Accepts the document either as a JSON value or as a string holding JSON.
/// Anything unparseable yields an empty list.
pub fn parse_errors(body: &Value) -> Vec<JsonApiError> {
    match body {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(parsed @ Value::Object(_)) => errors_from_document(&parsed),
            _ => Vec::new(),
        },
        Value::Object(_) => errors_from_document(body),
        _ => Vec::new(),
    }
}

fn errors_from_document(document: &Value) -> Vec<JsonApiError> {
    let Some(entries) = document.get("errors").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| JsonApiError {
            code: text_member(entry, "code"),
            title: text_member(entry, "title"),
            status: status_member(entry),
        })
        .collect()
}

fn text_member(entry: &Value, name: &str) -> String {
    match entry.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

// JSON:API says status is a string, but plenty of servers send a number.
fn status_member(entry: &Value) -> u16 {
    match entry.get("status") {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
