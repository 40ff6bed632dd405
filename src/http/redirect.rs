//! Bounded redirect following.

use log::{debug, warn};
use reqwest::Url;

use super::{HttpRequest, Transport, Verb};
use crate::error::ConnectionError;
use crate::response::Response;

/// How a redirect re-issues the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Same method, same body.
    PreserveMethod,
    /// Legacy user-agent behavior: re-issue as GET without a body. HEAD stays HEAD.
    SwitchToGet,
}

/// Statuses the controller follows. 304 and 306 are never followed.
pub const REDIRECT_POLICIES: [(u16, RedirectPolicy); 6] = [
    (301, RedirectPolicy::SwitchToGet),
    (302, RedirectPolicy::SwitchToGet),
    (303, RedirectPolicy::SwitchToGet),
    (305, RedirectPolicy::SwitchToGet),
    (307, RedirectPolicy::PreserveMethod),
    (308, RedirectPolicy::PreserveMethod),
];

/// Headers that describe a body and go away with it.
const BODY_HEADERS: [&str; 2] = ["content-type", "content-length"];

/// Credentials that must not leak to another origin.
const ORIGIN_BOUND_HEADERS: [&str; 2] = ["authorization", "cookie"];

impl RedirectPolicy {
    pub fn for_status(status: u16) -> Option<RedirectPolicy> {
        REDIRECT_POLICIES
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, policy)| *policy)
    }

    /// Builds the request for the next hop.
    pub fn next_request(self, previous: &HttpRequest, location: Url) -> HttpRequest {
        let mut next = previous.clone();

        if self == RedirectPolicy::SwitchToGet {
            if next.method != Verb::Head {
                next.method = Verb::Get;
            }
            next.body = None;
            for name in BODY_HEADERS {
                next.headers.remove(name);
            }
        }

        if location.origin() != previous.url.origin() {
            for name in ORIGIN_BOUND_HEADERS {
                next.headers.remove(name);
            }
        }

        next.url = location;
        next
    }
}

/// How a logical request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A response for the classifier: a non-redirect, or a redirect left
    /// unfollowed because the budget ran out.
    Completed(Response),
    /// A redirect whose `Location` is missing or unusable.
    Unroutable(Response),
}

/// Drives one logical request through at most `max_redirects` redirects.
pub struct RedirectController<'a, T: Transport + ?Sized> {
    transport: &'a T,
    max_redirects: u32,
}

impl<'a, T: Transport + ?Sized> RedirectController<'a, T> {
    pub fn new(transport: &'a T, max_redirects: u32) -> Self {
        Self {
            transport,
            max_redirects,
        }
    }

    /// Issues `request`, following redirects sequentially. A transport failure
    /// on any hop ends the chain immediately.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn run(&self, request: HttpRequest) -> Result<Outcome, ConnectionError> {
        let mut request = request;
        let mut followed: u32 = 0;

        loop {
            let response = self.transport.send(&request).await?;

            let Some(policy) = RedirectPolicy::for_status(response.status_code) else {
                return Ok(Outcome::Completed(response));
            };

            let Some(location) = resolve_location(&request.url, &response) else {
                warn!(
                    "HTTP {} from {} has no usable Location header",
                    response.status_code, request.url
                );
                return Ok(Outcome::Unroutable(response));
            };

            if followed >= self.max_redirects {
                debug!(
                    "Redirect limit of {} reached at {}, not following HTTP {}",
                    self.max_redirects, request.url, response.status_code
                );
                return Ok(Outcome::Completed(response));
            }

            followed += 1;
            debug!(
                "Following HTTP {} redirect {}/{} from {} to {}",
                response.status_code, followed, self.max_redirects, request.url, location
            );
            request = policy.next_request(&request, location);
        }
    }
}

/// Resolves the `Location` header against the URL that produced it.
fn resolve_location(current: &Url, response: &Response) -> Option<Url> {
    let location = response.header("location")?.trim();
    if location.is_empty() {
        return None;
    }

    let url = current.join(location).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::response::Headers;
    use serde_json::json;
    use std::time::Duration;

    fn request(method: Verb, url: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: Url::parse(url).unwrap(),
            headers: Headers::new(),
            body: None,
            timeout: Some(Duration::from_millis(1000)),
        }
    }

    fn redirect(status: u16, location: &str) -> Response {
        Response::new(status).with_header("location", location)
    }

    #[test]
    fn test_policy_table() {
        for status in [301, 302, 303, 305] {
            assert_eq!(RedirectPolicy::for_status(status), Some(RedirectPolicy::SwitchToGet));
        }
        for status in [307, 308] {
            assert_eq!(RedirectPolicy::for_status(status), Some(RedirectPolicy::PreserveMethod));
        }
        for status in [200, 300, 304, 306, 309, 404] {
            assert_eq!(RedirectPolicy::for_status(status), None);
        }
    }

    #[test]
    fn test_switch_to_get_drops_body() {
        let mut previous = request(Verb::Put, "http://api.test/a");
        previous.body = Some(json!("payload"));
        previous
            .headers
            .insert("content-type".to_string(), "text/plain".to_string());
        previous
            .headers
            .insert("accept".to_string(), "*/*".to_string());

        let next = RedirectPolicy::SwitchToGet
            .next_request(&previous, Url::parse("http://api.test/b").unwrap());

        assert_eq!(next.method, Verb::Get);
        assert_eq!(next.body, None);
        assert!(!next.headers.contains_key("content-type"));
        assert_eq!(next.headers.get("accept").map(String::as_str), Some("*/*"));
        assert_eq!(next.timeout, previous.timeout);
        assert_eq!(next.url.path(), "/b");
    }

    #[test]
    fn test_switch_to_get_keeps_head() {
        let previous = request(Verb::Head, "http://api.test/a");
        let next = RedirectPolicy::SwitchToGet
            .next_request(&previous, Url::parse("http://api.test/b").unwrap());
        assert_eq!(next.method, Verb::Head);
    }

    #[test]
    fn test_preserve_method_keeps_body() {
        let mut previous = request(Verb::Patch, "http://api.test/a");
        previous.body = Some(json!({ "op": "replace" }));

        let next = RedirectPolicy::PreserveMethod
            .next_request(&previous, Url::parse("http://api.test/b").unwrap());

        assert_eq!(next.method, Verb::Patch);
        assert_eq!(next.body, previous.body);
    }

    #[test]
    fn test_cross_origin_drops_credentials() {
        let mut previous = request(Verb::Get, "http://api.test/a");
        previous
            .headers
            .insert("authorization".to_string(), "Bearer secret".to_string());

        let same = RedirectPolicy::PreserveMethod
            .next_request(&previous, Url::parse("http://api.test/b").unwrap());
        assert!(same.headers.contains_key("authorization"));

        let other = RedirectPolicy::PreserveMethod
            .next_request(&previous, Url::parse("http://elsewhere.test/b").unwrap());
        assert!(!other.headers.contains_key("authorization"));
    }

    #[test]
    fn test_resolve_location() {
        let base = Url::parse("http://api.test/v1/items").unwrap();

        let relative = resolve_location(&base, &redirect(301, "/v2/items")).unwrap();
        assert_eq!(relative.as_str(), "http://api.test/v2/items");

        let absolute = resolve_location(&base, &redirect(301, "https://other.test/x")).unwrap();
        assert_eq!(absolute.as_str(), "https://other.test/x");

        assert!(resolve_location(&base, &Response::new(301)).is_none());
        assert!(resolve_location(&base, &redirect(301, "  ")).is_none());
        assert!(resolve_location(&base, &redirect(301, "ftp://files.test/x")).is_none());
    }

    #[tokio::test]
    async fn test_chain_within_budget_resolves() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/a")
            .times(1)
            .returning(|_| Ok(redirect(301, "/b")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/b")
            .times(1)
            .returning(|_| Ok(redirect(301, "/c")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/c")
            .times(1)
            .returning(|_| Ok(Response::new(200).with_data("200 OK")));

        let outcome = RedirectController::new(&transport, 5)
            .run(request(Verb::Get, "http://api.test/a"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed(Response::new(200).with_data("200 OK")));
    }

    #[tokio::test]
    async fn test_chain_beyond_budget_returns_unfollowed_redirect() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/a")
            .times(1)
            .returning(|_| Ok(redirect(302, "/b")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/b")
            .times(1)
            .returning(|_| Ok(redirect(307, "/c")));

        let outcome = RedirectController::new(&transport, 1)
            .run(request(Verb::Get, "http://api.test/a"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed(redirect(307, "/c")));
    }

    #[tokio::test]
    async fn test_chain_exactly_at_budget_resolves() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/a")
            .times(1)
            .returning(|_| Ok(redirect(301, "/b")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/b")
            .times(1)
            .returning(|_| Ok(redirect(301, "/c")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/c")
            .times(1)
            .returning(|_| Ok(Response::new(200)));

        let outcome = RedirectController::new(&transport, 2)
            .run(request(Verb::Get, "http://api.test/a"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed(Response::new(200)));
    }

    #[tokio::test]
    async fn test_chain_one_past_budget_returns_last_redirect() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/a")
            .times(1)
            .returning(|_| Ok(redirect(301, "/b")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/b")
            .times(1)
            .returning(|_| Ok(redirect(301, "/c")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/c")
            .times(1)
            .returning(|_| Ok(redirect(302, "/d")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/d")
            .times(0)
            .returning(|_| Ok(Response::new(200)));

        let outcome = RedirectController::new(&transport, 2)
            .run(request(Verb::Get, "http://api.test/a"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed(redirect(302, "/d")));
    }

    #[tokio::test]
    async fn test_zero_budget_never_follows() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(redirect(301, "/elsewhere")));

        let outcome = RedirectController::new(&transport, 0)
            .run(request(Verb::Put, "http://api.test/301"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed(redirect(301, "/elsewhere")));
    }

    #[tokio::test]
    async fn test_endless_redirects_are_bounded() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(4)
            .returning(|_| Ok(redirect(308, "/loop")));

        let outcome = RedirectController::new(&transport, 3)
            .run(request(Verb::Get, "http://api.test/loop"))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Completed(r) if r.status_code == 308));
    }

    #[tokio::test]
    async fn test_missing_location_is_unroutable() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(Response::new(303)));

        let outcome = RedirectController::new(&transport, 5)
            .run(request(Verb::Post, "http://api.test/a"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Unroutable(Response::new(303)));
    }

    #[tokio::test]
    async fn test_not_modified_is_not_followed() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(redirect(304, "/b")));

        let outcome = RedirectController::new(&transport, 5)
            .run(request(Verb::Get, "http://api.test/a"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed(redirect(304, "/b")));
    }

    #[tokio::test]
    async fn test_see_other_switches_post_to_get() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.method == Verb::Post)
            .times(1)
            .returning(|_| Ok(redirect(303, "/result")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.method == Verb::Get && r.body.is_none())
            .times(1)
            .returning(|_| Ok(Response::new(200)));

        let mut first = request(Verb::Post, "http://api.test/jobs");
        first.body = Some(json!({ "job": 1 }));
        let outcome = RedirectController::new(&transport, 5).run(first).await.unwrap();

        assert_eq!(outcome, Outcome::Completed(Response::new(200)));
    }

    #[tokio::test]
    async fn test_transport_failure_ends_chain() {
        use crate::error::ConnectionErrorKind;

        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/a")
            .times(1)
            .returning(|_| Ok(redirect(301, "/b")));
        transport
            .expect_send()
            .withf(|r: &HttpRequest| r.url.path() == "/b")
            .times(1)
            .returning(|r| {
                Err(ConnectionError::new(
                    ConnectionErrorKind::Connect,
                    r.url.as_str(),
                    "connection refused",
                ))
            });

        let err = RedirectController::new(&transport, 5)
            .run(request(Verb::Get, "http://api.test/a"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ConnectionErrorKind::Connect);
        assert_eq!(err.url, "http://api.test/b");
    }
}
