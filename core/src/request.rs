//! Request descriptor and the pure URL/body builders.
//!
//! # Design
//! `HttpRequest` is assembled by the host, then moved into a worker and only
//! read from there on. Parameters and headers live in `BTreeMap`s so the
//! generated query string is deterministic.
//!
//! Query strings are plain `key=value` joins. Nothing is percent-encoded:
//! callers that need escaping must encode keys and values themselves.

use std::collections::BTreeMap;

use crate::http::HttpMethod;

/// Default `User-Agent` seeded into every request.
pub const DEFAULT_USER_AGENT: &str = concat!("ureq/3 chttp/", env!("CARGO_PKG_VERSION"));

/// Default `Content-Type` seeded into every request.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Opaque reference to a host-side callback. Only the consumer thread ever
/// resolves it back into something callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackHandle(pub u64);

/// The pair of callbacks attached to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Callbacks {
    pub on_success: CallbackHandle,
    pub on_failure: CallbackHandle,
}

impl Callbacks {
    pub fn new(on_success: CallbackHandle, on_failure: CallbackHandle) -> Self {
        Self {
            on_success,
            on_failure,
        }
    }
}

/// A fully described HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    url: String,
    parameters: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
    body: Option<String>,
    callbacks: Callbacks,
}

impl HttpRequest {
    /// Create a request with the default `User-Agent` and `Content-Type`.
    pub fn new(method: HttpMethod, url: impl Into<String>, callbacks: Callbacks) -> Self {
        Self::with_user_agent(method, url, callbacks, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(
        method: HttpMethod,
        url: impl Into<String>,
        callbacks: Callbacks,
        user_agent: &str,
    ) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("User-Agent".to_string(), user_agent.to_string());
        headers.insert("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
        Self {
            method,
            url: url.into(),
            parameters: BTreeMap::new(),
            headers,
            body: None,
            callbacks,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_param(key, value);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.set_body(body);
        self
    }

    /// Override the seeded `Content-Type` header.
    pub fn content_type(self, value: impl Into<String>) -> Self {
        self.header("Content-Type", value)
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    /// Insert a header. Names are matched exactly, so `"Content-Type"`
    /// replaces the default while `"content-type"` is sent alongside it.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// The explicit body, if one was set and is non-empty.
    pub fn explicit_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }

    pub fn callbacks(&self) -> Callbacks {
        self.callbacks
    }
}

/// Join parameters as `key=value` pairs separated by `&`, without escaping.
pub fn build_query_string(parameters: &BTreeMap<String, String>) -> String {
    let mut query = String::new();
    for (key, value) in parameters {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(key);
        query.push('=');
        query.push_str(value);
    }
    query
}

/// The URL presented to the transport for the first attempt.
///
/// Only GET and HEAD carry parameters in the query string.
pub fn build_url(request: &HttpRequest) -> String {
    if request.method.is_like_post() || request.parameters.is_empty() {
        return request.url.clone();
    }
    format!("{}?{}", request.url, build_query_string(&request.parameters))
}

/// The request body for body-carrying methods, `None` for GET and HEAD.
///
/// A non-empty explicit body wins over the parameters entirely.
pub fn resolve_body(request: &HttpRequest) -> Option<String> {
    if !request.method.is_like_post() {
        return None;
    }
    Some(match request.explicit_body() {
        Some(body) => body.to_string(),
        None => build_query_string(&request.parameters),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callbacks() -> Callbacks {
        Callbacks::new(CallbackHandle(1), CallbackHandle(2))
    }

    fn request(method: HttpMethod) -> HttpRequest {
        HttpRequest::new(method, "http://example.test/x", callbacks())
    }

    #[test]
    fn query_string_empty_for_no_parameters() {
        assert_eq!(build_query_string(&BTreeMap::new()), "");
    }

    #[test]
    fn query_string_joins_pairs_with_ampersand() {
        let mut params = BTreeMap::new();
        params.insert("a".to_string(), "1".to_string());
        params.insert("b".to_string(), "2".to_string());
        assert_eq!(build_query_string(&params), "a=1&b=2");
    }

    #[test]
    fn query_string_does_not_escape_values() {
        let mut params = BTreeMap::new();
        params.insert("q".to_string(), "a b&c".to_string());
        assert_eq!(build_query_string(&params), "q=a b&c");
    }

    #[test]
    fn get_and_head_append_query_only_with_parameters() {
        for method in [HttpMethod::Get, HttpMethod::Head] {
            assert_eq!(build_url(&request(method)), "http://example.test/x");
            let req = request(method).param("q", "1");
            assert_eq!(build_url(&req), "http://example.test/x?q=1");
        }
    }

    #[test]
    fn body_like_methods_never_append_query() {
        for method in HttpMethod::ALL.into_iter().filter(|m| m.is_like_post()) {
            let req = request(method).param("q", "1").param("r", "2");
            assert_eq!(build_url(&req), "http://example.test/x", "{method}");
        }
    }

    #[test]
    fn resolve_body_prefers_explicit_body() {
        for method in HttpMethod::ALL.into_iter().filter(|m| m.is_like_post()) {
            let req = request(method).param("q", "1").body("{\"raw\":true}");
            assert_eq!(resolve_body(&req).as_deref(), Some("{\"raw\":true}"));
        }
    }

    #[test]
    fn resolve_body_falls_back_to_parameters() {
        let req = request(HttpMethod::Post).param("a", "1").param("b", "2");
        assert_eq!(resolve_body(&req).as_deref(), Some("a=1&b=2"));
    }

    #[test]
    fn empty_explicit_body_counts_as_absent() {
        let req = request(HttpMethod::Put).param("a", "1").body("");
        assert_eq!(resolve_body(&req).as_deref(), Some("a=1"));
    }

    #[test]
    fn resolve_body_is_none_for_get_and_head() {
        assert!(resolve_body(&request(HttpMethod::Get).body("x")).is_none());
        assert!(resolve_body(&request(HttpMethod::Head).param("a", "1")).is_none());
    }

    #[test]
    fn defaults_seed_user_agent_and_content_type() {
        let req = request(HttpMethod::Get);
        assert_eq!(req.headers()["User-Agent"], DEFAULT_USER_AGENT);
        assert_eq!(req.headers()["Content-Type"], DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn caller_headers_override_defaults() {
        let req = request(HttpMethod::Post)
            .content_type("application/json")
            .header("User-Agent", "custom/1.0");
        assert_eq!(req.headers()["Content-Type"], "application/json");
        assert_eq!(req.headers()["User-Agent"], "custom/1.0");
        assert_eq!(req.headers().len(), 2);
    }

    #[test]
    fn callbacks_are_kept_verbatim() {
        let req = request(HttpMethod::Get);
        assert_eq!(req.callbacks().on_success, CallbackHandle(1));
        assert_eq!(req.callbacks().on_failure, CallbackHandle(2));
    }
}
