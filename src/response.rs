//! Normalized response returned by every verb.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Header map keyed by lower-cased header name.
pub type Headers = BTreeMap<String, String>;

/// One completed HTTP exchange: status, headers and decoded body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub data: Value,
}

impl Response {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Lower-cases header names, keeping the last value for duplicates.
pub fn normalize_headers<'a, I>(headers: I) -> Headers
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    headers
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = Response::new(200).with_header("Content-Type", "text/plain");
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(response.header("server"), None);
    }

    #[test]
    fn test_deserialize_uses_camel_case_and_defaults() {
        let response: Response = serde_json::from_value(json!({
            "statusCode": 201,
            "data": "201 Created"
        }))
        .unwrap();

        assert_eq!(response.status_code, 201);
        assert!(response.headers.is_empty());
        assert_eq!(response.data, json!("201 Created"));
    }

    #[test]
    fn test_deserialize_rejects_non_numeric_status() {
        let result: Result<Response, _> = serde_json::from_value(json!({ "statusCode": "200" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_headers() {
        let mut raw = Headers::new();
        raw.insert("Accept".to_string(), "*/*".to_string());
        raw.insert("X-Trace".to_string(), "abc".to_string());

        let headers = normalize_headers(&raw);
        assert_eq!(headers.get("accept").map(String::as_str), Some("*/*"));
        assert_eq!(headers.get("x-trace").map(String::as_str), Some("abc"));
    }
}
