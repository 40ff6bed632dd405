//! Queue-driven stand-in for [`RestClient`](super::RestClient).

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::RestVerbs;
use crate::error::{Error, Result, UsageError};
use crate::http::Verb;
use crate::options::RequestOptions;
use crate::response::{Headers, Response};

#[derive(Debug)]
enum MockAction {
    Resolve(Response),
    ResolveJson(Value),
    Reject(Error),
}

/// Implements [`RestVerbs`] from a FIFO of canned results. Never touches the
/// network, never follows redirects and never classifies.
///
/// Each verb call consumes exactly one queued item. The queue is shared by all
/// verbs; sharing one instance between concurrent callers gives no ordering
/// guarantee beyond pop order.
#[derive(Debug, Default)]
pub struct MockRestClient {
    queue: Mutex<VecDeque<MockAction>>,
}

impl MockRestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next verb call.
    pub fn mock_resolve(&self, response: Response) -> &Self {
        self.queue().push_back(MockAction::Resolve(response));
        self
    }

    /// Queues a response document such as `{"statusCode": 200, "data": "OK"}`.
    ///
    /// The document is validated when consumed: without a numeric `statusCode`
    /// the call fails with [`UsageError::MalformedMockResponse`].
    pub fn mock_resolve_json(&self, document: Value) -> &Self {
        self.queue().push_back(MockAction::ResolveJson(document));
        self
    }

    /// Queues an error for the next verb call. It is returned exactly as given.
    pub fn mock_reject(&self, error: impl Into<Error>) -> &Self {
        self.queue().push_back(MockAction::Reject(error.into()));
        self
    }

    /// Discards everything queued.
    pub fn reset(&self) -> &Self {
        self.queue().clear();
        self
    }

    /// Number of queued items not yet consumed.
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<MockAction>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next(&self, verb: Verb, uri: &str) -> Result<Response> {
        let action = self.queue().pop_front();
        debug!("Mock {} {}: {:?}", verb, uri, action);

        match action {
            Some(MockAction::Resolve(response)) => Ok(response),
            Some(MockAction::ResolveJson(document)) => serde_json::from_value(document)
                .map_err(|e| {
                    UsageError::MalformedMockResponse {
                        verb,
                        reason: e.to_string(),
                    }
                    .into()
                }),
            Some(MockAction::Reject(error)) => Err(error),
            None => Err(UsageError::NotMocked { verb }.into()),
        }
    }
}

#[async_trait]
impl RestVerbs for MockRestClient {
    async fn get(
        &self,
        uri: &str,
        _headers: Option<&Headers>,
        _options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.next(Verb::Get, uri)
    }

    async fn head(
        &self,
        uri: &str,
        _headers: Option<&Headers>,
        _options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.next(Verb::Head, uri)
    }

    async fn delete(
        &self,
        uri: &str,
        _headers: Option<&Headers>,
        _options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.next(Verb::Delete, uri)
    }

    async fn post(
        &self,
        uri: &str,
        _payload: Value,
        _headers: Option<&Headers>,
        _options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.next(Verb::Post, uri)
    }

    async fn put(
        &self,
        uri: &str,
        _payload: Value,
        _headers: Option<&Headers>,
        _options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.next(Verb::Put, uri)
    }

    async fn patch(
        &self,
        uri: &str,
        _payload: Value,
        _headers: Option<&Headers>,
        _options: Option<RequestOptions>,
    ) -> Result<Response> {
        self.next(Verb::Patch, uri)
    }
}
