use serde_json::Value;

use super::StatusKind;
use crate::jsonapi::{JsonApiError, parse_errors};
use crate::response::{Headers, Response};

/// Hundred-floor of a status code, e.g. 437 -> 400.
pub fn bucket_of(status: u16) -> u16 {
    status / 100 * 100
}

/// A non-success response, classified into exactly one [`StatusKind`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} (HTTP {status_code})", .kind.message())]
pub struct StatusException {
    kind: StatusKind,
    status_code: u16,
    errors: Vec<JsonApiError>,
    data: Value,
    headers: Headers,
}

impl StatusException {
    /// Builds the exception for `response`, picking the variant from its status.
    pub fn from_response(response: Response) -> Self {
        let kind = StatusKind::for_status(response.status_code);
        Self::with_kind(kind, response)
    }

    /// Builds the exception with an explicit variant.
    pub(crate) fn with_kind(kind: StatusKind, response: Response) -> Self {
        let errors = parse_errors(&response.data);
        Self {
            kind,
            status_code: response.status_code,
            errors,
            data: response.data,
            headers: response.headers,
        }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    /// The exact HTTP status the server returned.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The hundred-floor of [`status_code`](Self::status_code).
    pub fn bucket_status(&self) -> u16 {
        bucket_of(self.status_code)
    }

    /// JSON:API errors found in the body, in document order. May be empty.
    pub fn errors(&self) -> &[JsonApiError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// The response body, verbatim.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 3xx by the status the server sent, whatever the variant.
    pub fn is_redirection(&self) -> bool {
        self.bucket_status() == 300
    }

    /// 4xx by the status the server sent, whatever the variant.
    pub fn is_client_error(&self) -> bool {
        self.bucket_status() == 400
    }

    /// 5xx by the status the server sent, whatever the variant.
    pub fn is_server_error(&self) -> bool {
        self.bucket_status() == 500
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    /// Reassembles the response this exception was built from.
    pub fn into_response(self) -> Response {
        Response {
            status_code: self.status_code,
            headers: self.headers,
            data: self.data,
        }
    }
}
