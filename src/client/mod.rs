//! The verb facade and its test double.

mod mock;

pub use mock::MockRestClient;

use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;

use crate::classify::{classify, classify_unroutable};
use crate::error::{Error, Result, UsageError};
use crate::http::{HttpRequest, Outcome, RedirectController, ReqwestTransport, Transport, Verb};
use crate::options::{ClientConfig, RequestOptions};
use crate::response::{Headers, Response, normalize_headers};

/// The verb contract shared by [`RestClient`] and [`MockRestClient`].
///
/// Code written against `RestVerbs` can swap the real client for the mock in
/// tests without changes.
#[async_trait]
pub trait RestVerbs: Send + Sync {
    async fn get(
        &self,
        uri: &str,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response>;

    async fn head(
        &self,
        uri: &str,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response>;

    async fn delete(
        &self,
        uri: &str,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response>;

    async fn post(
        &self,
        uri: &str,
        payload: Value,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response>;

    async fn put(
        &self,
        uri: &str,
        payload: Value,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response>;

    async fn patch(
        &self,
        uri: &str,
        payload: Value,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response>;
}

/// REST client: transport, redirect following and status classification.
#[derive(Clone)]
pub struct RestClient<T: Transport = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
}

impl RestClient<ReqwestTransport> {
    /// Creates a client with the default [`ClientConfig`].
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> RestClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Runs one logical request: at most `max_redirects + 1` physical calls,
    /// then classification of the final response.
    #[tracing::instrument(skip(self, payload, headers))]
    pub async fn request(
        &self,
        verb: Verb,
        uri: &str,
        payload: Option<Value>,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response> {
        let options = self.config.resolve(options)?;

        let url = Url::parse(uri).map_err(|e| UsageError::InvalidUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        let request = HttpRequest {
            method: verb,
            url,
            headers: merge_headers(&self.config.default_headers, headers)?,
            body: payload.filter(|_| verb.has_body()),
            timeout: Some(options.timeout),
        };

        let outcome = RedirectController::new(&self.transport, options.max_redirects)
            .run(request)
            .await?;

        let result = match outcome {
            Outcome::Completed(response) => classify(response, options.error_mode),
            Outcome::Unroutable(response) => classify_unroutable(response, options.error_mode),
        };

        match &result {
            Ok(response) => debug!("{} {} completed with HTTP {}", verb, uri, response.status_code),
            Err(exception) => debug!("{} {} failed: {}", verb, uri, exception),
        }

        result.map_err(Error::from)
    }
}

#[async_trait]
impl<T: Transport> RestVerbs for RestClient<T> {
    async fn get(
        &self,
        uri: &str,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.request(Verb::Get, uri, None, headers, options).await
    }

    async fn head(
        &self,
        uri: &str,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.request(Verb::Head, uri, None, headers, options).await
    }

    async fn delete(
        &self,
        uri: &str,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.request(Verb::Delete, uri, None, headers, options).await
    }

    async fn post(
        &self,
        uri: &str,
        payload: Value,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.request(Verb::Post, uri, Some(payload), headers, options)
            .await
    }

    async fn put(
        &self,
        uri: &str,
        payload: Value,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.request(Verb::Put, uri, Some(payload), headers, options)
            .await
    }

    async fn patch(
        &self,
        uri: &str,
        payload: Value,
        headers: Option<&Headers>,
        options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.request(Verb::Patch, uri, Some(payload), headers, options)
            .await
    }
}

/// Per-call headers override the configured defaults. Names are lower-cased
/// and both names and values must be valid HTTP.
fn merge_headers(defaults: &Headers, extra: Option<&Headers>) -> Result<Headers, UsageError> {
    let mut merged = normalize_headers(defaults);
    if let Some(extra) = extra {
        merged.extend(normalize_headers(extra));
    }

    for (name, value) in &merged {
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| UsageError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        HeaderValue::from_str(value).map_err(|e| UsageError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(merged)
}
