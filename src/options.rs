//! Client defaults and per-call options.

use std::time::Duration;

use crate::error::UsageError;
use crate::response::Headers;

pub const DEFAULT_MAX_REDIRECTS: u32 = 5;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_USER_AGENT: &str = concat!("restclient/", env!("CARGO_PKG_VERSION"));

/// What a verb does with a non-success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail with a classified [`StatusException`](crate::status::StatusException).
    #[default]
    Throw,
    /// Return the raw response as if it had succeeded.
    Response,
}

/// Per-call overrides. Unset fields fall back to the client's [`ClientConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestOptions {
    pub max_redirects: Option<u32>,
    pub timeout_ms: Option<u64>,
    pub error_mode: Option<ErrorMode>,
}

impl RequestOptions {
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = Some(max_redirects);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = Some(error_mode);
        self
    }
}

/// Immutable defaults injected into a client at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub max_redirects: u32,
    pub timeout_ms: u64,
    pub error_mode: ErrorMode,
    pub user_agent: String,
    pub default_headers: Headers,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            error_mode: ErrorMode::Throw,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: Headers::new(),
        }
    }
}

impl ClientConfig {
    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.error_mode = error_mode;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_default_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.default_headers
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Merges per-call options over these defaults.
    pub fn resolve(&self, options: Option<RequestOptions>) -> Result<ResolvedOptions, UsageError> {
        let options = options.unwrap_or_default();
        let timeout_ms = options.timeout_ms.unwrap_or(self.timeout_ms);
        if timeout_ms == 0 {
            return Err(UsageError::InvalidOption(
                "timeout_ms must be a positive number of milliseconds".to_string(),
            ));
        }

        Ok(ResolvedOptions {
            max_redirects: options.max_redirects.unwrap_or(self.max_redirects),
            timeout: Duration::from_millis(timeout_ms),
            error_mode: options.error_mode.unwrap_or(self.error_mode),
        })
    }
}

/// Options in effect for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub max_redirects: u32,
    pub timeout: Duration,
    pub error_mode: ErrorMode,
}
