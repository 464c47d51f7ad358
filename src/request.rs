//! Incoming HTTP request type.
//!
//! A [`Request`] is an immutable value as far as handlers are concerned.
//! Pipeline steps that need to change it (method override, body decoding)
//! consume it and hand back a new one through the `with_*` methods.

use std::collections::HashMap;

use bytes::Bytes;
use serde_json::Value;

use crate::method::Method;

/// An incoming HTTP request.
///
/// Built by the server from the hyper request, or by hand in tests:
///
/// ```rust
/// use campsite::{Method, Request};
///
/// let req = Request::new(Method::Post, "/campgrounds/7/edit?_method=PUT")
///     .header("content-type", "application/x-www-form-urlencoded")
///     .body("camp%5Btitle%5D=Pine+Ridge");
///
/// assert_eq!(req.path(), "/campgrounds/7/edit");
/// assert_eq!(req.query_param("_method").as_deref(), Some("PUT"));
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) payload: Option<Value>,
}

impl Request {
    /// A request for `target`, an origin-form URI (`/path?query`).
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_owned(),
            query,
            headers: Vec::new(),
            body: Bytes::new(),
            params: HashMap::new(),
            payload: None,
        }
    }

    /// Appends a header. Returns `self` for chaining.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Replaces the raw body. Returns `self` for chaining.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn raw_body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First value of a percent-decoded query-string parameter.
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/campgrounds/{id}`, `req.param("id")` on `/campgrounds/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The decoded body document, once a decoding step has run.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// The same request, routed as `method`.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// The same request, carrying `payload` as its decoded body.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }
}
