//! HTTP plumbing: the transport seam and the redirect controller.

mod redirect;
mod transport;

pub use redirect::{Outcome, REDIRECT_POLICIES, RedirectController, RedirectPolicy};
pub use transport::{ReqwestTransport, Transport, decode_body};

#[cfg(test)]
pub use transport::MockTransport;

use reqwest::{Method, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::response::Headers;

/// The verbs the clients expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }

    /// Whether the verb carries a payload.
    pub fn has_body(self) -> bool {
        matches!(self, Verb::Post | Verb::Put | Verb::Patch)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Head => Method::HEAD,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Patch => Method::PATCH,
            Verb::Delete => Method::DELETE,
        }
    }
}

/// One hop's worth of request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Verb,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Value>,
    /// Applies to this hop only.
    pub timeout: Option<Duration>,
}
