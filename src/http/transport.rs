//! Single-hop transport over reqwest.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url, header::HeaderMap, redirect};
use serde_json::Value;
use std::error::Error as StdError;

use super::HttpRequest;
use crate::error::{ConnectionError, ConnectionErrorKind, UsageError};
use crate::options::ClientConfig;
use crate::response::{Headers, Response};

/// Performs exactly one HTTP request. Must not follow redirects itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<Response, ConnectionError>;
}

/// [`Transport`] backed by a reqwest [`Client`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wraps an existing client. The client must be built with
    /// `redirect::Policy::none()`, otherwise redirects never reach the controller.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, UsageError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| UsageError::InvalidOption(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self::new(client))
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &HttpRequest) -> Result<Response, ConnectionError> {
        debug!("{} {}...", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &request.body {
            None | Some(Value::Null) => builder,
            Some(Value::String(text)) => builder.body(text.clone()),
            Some(document) => builder.json(document),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| connection_error(&request.url, &e, ConnectionErrorKind::Request))?;

        let status_code = response.status().as_u16();
        let headers = collect_headers(response.headers());

        let text = response
            .text()
            .await
            .map_err(|e| connection_error(&request.url, &e, ConnectionErrorKind::Body))?;

        debug!("{} {} -> HTTP {}", request.method, request.url, status_code);

        let data = decode_body(headers.get("content-type").map(String::as_str), text);
        Ok(Response {
            status_code,
            headers,
            data,
        })
    }
}

/// Decodes a response body: JSON content types are parsed when possible,
/// everything else stays text. An empty body is `null`.
pub fn decode_body(content_type: Option<&str>, text: String) -> Value {
    if text.is_empty() {
        return Value::Null;
    }

    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);
    if !is_json {
        return Value::String(text);
    }

    match serde_json::from_str(&text) {
        Ok(document) => document,
        Err(_) => Value::String(text),
    }
}

fn collect_headers(raw: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in raw {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    headers
}

fn connection_error(
    url: &Url,
    error: &reqwest::Error,
    fallback: ConnectionErrorKind,
) -> ConnectionError {
    let kind = if error.is_timeout() {
        ConnectionErrorKind::Timeout
    } else if error.is_connect() {
        ConnectionErrorKind::Connect
    } else {
        fallback
    };

    let mut message = error.to_string();
    let mut source = StdError::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    debug!("{} failed ({}): {}", url, kind, message);
    ConnectionError::new(kind, url.as_str(), message)
}
