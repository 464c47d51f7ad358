//! HTTP status codes as a typed enum.
//!
//! Only the codes campsite actually answers with are listed. A [`Status`] is
//! always a valid code, so a [`Fault`](crate::Fault) can never carry a bogus
//! one. The default is `500 Internal Server Error`.
//!
//! ```rust
//! use campsite::{Response, Status};
//!
//! Response::status(Status::NotFound);
//!
//! assert_eq!(u16::from(Status::Found), 302);
//! assert_eq!(Status::default(), Status::InternalServerError);
//! ```

use std::fmt;

/// A status code campsite responds with.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    Found,               // 302

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    NotFound,            // 404
    PayloadTooLarge,     // 413

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    #[default]
    InternalServerError, // 500
}

impl Status {
    /// Numeric code, e.g. `404`.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok                  => 200,
            Self::Found               => 302,
            Self::BadRequest          => 400,
            Self::NotFound            => 404,
            Self::PayloadTooLarge     => 413,
            Self::InternalServerError => 500,
        }
    }

    /// Canonical reason phrase (RFC 9110 §15).
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok                  => "OK",
            Self::Found               => "Found",
            Self::BadRequest          => "Bad Request",
            Self::NotFound            => "Not Found",
            Self::PayloadTooLarge     => "Content Too Large",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    /// `true` for 5xx codes.
    pub fn is_server_error(self) -> bool {
        self.code() >= 500
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.code()
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> http::StatusCode {
        match s {
            Status::Ok                  => http::StatusCode::OK,
            Status::Found               => http::StatusCode::FOUND,
            Status::BadRequest          => http::StatusCode::BAD_REQUEST,
            Status::NotFound            => http::StatusCode::NOT_FOUND,
            Status::PayloadTooLarge     => http::StatusCode::PAYLOAD_TOO_LARGE,
            Status::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}
