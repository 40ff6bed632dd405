//! Error types returned by the clients.

use std::fmt;

use crate::http::Verb;
use crate::status::StatusException;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure a verb call can produce.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The server answered with a non-success status.
    #[error(transparent)]
    Status(#[from] StatusException),
    /// No response was received.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    /// The call was malformed or the mock was not primed.
    #[error(transparent)]
    Usage(#[from] UsageError),
}

impl Error {
    /// The classified exception, if the server answered.
    pub fn as_status(&self) -> Option<&StatusException> {
        match self {
            Error::Status(exception) => Some(exception),
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}

/// Why a hop produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
}

impl fmt::Display for ConnectionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionErrorKind::Timeout => write!(f, "timed out"),
            ConnectionErrorKind::Connect => write!(f, "connection failed"),
            ConnectionErrorKind::Request => write!(f, "request failed"),
            ConnectionErrorKind::Body => write!(f, "failed to read response body"),
        }
    }
}

/// Transport-level failure: unreachable host, refused connection, timeout, reset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Network connection to {url} {kind}: {message}")]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub url: String,
    pub message: String,
}

impl ConnectionError {
    pub fn new(kind: ConnectionErrorKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ConnectionErrorKind::Timeout
    }
}

/// Programmer errors: nothing went over the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Please mock the {verb} response using mock_resolve() or mock_reject().")]
    NotMocked { verb: Verb },
    #[error("Mocked {verb} response is not a valid response document: {reason}")]
    MalformedMockResponse { verb: Verb, reason: String },
    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Response;

    #[test]
    fn test_not_mocked_message_names_verb() {
        let err = UsageError::NotMocked { verb: Verb::Put };
        assert_eq!(
            err.to_string(),
            "Please mock the PUT response using mock_resolve() or mock_reject()."
        );
    }

    #[test]
    fn test_connection_error_display() {
        let err = ConnectionError::new(
            ConnectionErrorKind::Timeout,
            "http://127.0.0.1:1/slow",
            "operation timed out",
        );
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Network connection to http://127.0.0.1:1/slow timed out: operation timed out"
        );
    }

    #[test]
    fn test_error_is_transparent() {
        let status = StatusException::from_response(Response::new(404));
        let err = Error::from(status.clone());
        assert_eq!(err.to_string(), status.to_string());
        assert_eq!(err.as_status(), Some(&status));
        assert!(!err.is_connection());

        let err = Error::from(UsageError::InvalidOption("timeout_ms must be positive".into()));
        assert!(err.is_usage());
        assert!(err.as_status().is_none());
    }
}
