//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers do not usually build a [`Response`] by hand; they return a
//! [`Reply`](crate::controller::Reply) and let it pick the view or redirect.
//! The terminal fault handler is the other producer.

use bytes::Bytes;
use http_body_util::Full;
use maud::Markup;

use crate::status::Status;

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use campsite::{Response, Status};
///
/// Response::text("hello");
/// Response::status(Status::NotFound);
/// Response::redirect("/campgrounds");
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use campsite::{Response, Status};
///
/// let res = Response::builder()
///     .status(Status::BadRequest)
///     .header("cache-control", "no-store")
///     .text("nope");
/// assert_eq!(res.status_code(), Status::BadRequest);
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: Status,
}

impl Response {
    /// `200 OK` with `text/html; charset=utf-8`.
    pub fn html(markup: Markup) -> Self {
        Self::builder().html(markup)
    }

    /// `200 OK` with `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Vec::new(), headers: Vec::new(), status: code }
    }

    /// `302 Found` pointing the browser at `location`.
    pub fn redirect(location: &str) -> Self {
        Self::builder()
            .status(Status::Found)
            .header("location", location)
            .no_body()
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok }
    }

    pub fn status_code(&self) -> Status { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Converts into the hyper response written to the wire.
    ///
    /// Headers that are not valid HTTP tokens are dropped with a warning
    /// rather than failing the whole response.
    /// Same status and headers, empty body. Used to answer `HEAD`.
    pub(crate) fn without_body(mut self) -> Self {
        self.body.clear();
        self
    }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status.into();
        let headers = res.headers_mut();
        for (name, value) in self.headers {
            match (
                http::HeaderName::from_bytes(name.as_bytes()),
                http::HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => tracing::warn!(header = %name, "dropping invalid response header"),
            }
        }
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
/// Terminated by a typed body method, so you always know what you're sending.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with rendered markup (`text/html; charset=utf-8`).
    pub fn html(self, markup: Markup) -> Response {
        self.finish(HTML, markup.into_string().into_bytes())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(TEXT, body.into().into_bytes())
    }

    /// Terminate with no body (e.g. a redirect).
    pub fn no_body(self) -> Response {
        Response { body: Vec::new(), headers: self.headers, status: self.status }
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { body, headers, status: self.status }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Anything a handler returns in its `Ok` arm must implement this.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for Markup {
    fn into_response(self) -> Response { Response::html(self) }
}

/// Return a [`Status`] directly from a handler: `Ok(Status::NotFound)`
impl IntoResponse for Status {
    fn into_response(self) -> Response { Response::status(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location_without_body() {
        let res = Response::redirect("/campgrounds/1");
        assert_eq!(res.status_code(), Status::Found);
        assert_eq!(res.header("Location"), Some("/campgrounds/1"));
        assert!(res.body().is_empty());
    }

    #[test]
    fn into_inner_keeps_status_and_headers() {
        let inner = Response::builder()
            .status(Status::NotFound)
            .header("x-trace", "abc")
            .text("missing")
            .into_inner();
        assert_eq!(inner.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(inner.headers()["content-type"], TEXT);
        assert_eq!(inner.headers()["x-trace"], "abc");
    }

    #[test]
    fn into_inner_drops_invalid_headers() {
        let inner = Response::builder()
            .header("bad header", "value")
            .no_body()
            .into_inner();
        assert!(inner.headers().is_empty());
    }
}
