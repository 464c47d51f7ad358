//! Typed faults: the single currency of request failure.
//!
//! Anything that goes wrong while serving a request (a malformed body, a
//! schema violation, an unknown route, a store error, a panicking handler)
//! becomes a [`Fault`]. Faults are never rendered where they are raised; they
//! travel up to the router's terminal fault handler, which is the only place
//! that turns them into a page.

use std::fmt;

use crate::status::Status;

/// An HTTP status plus a human-readable message.
///
/// ```rust
/// use campsite::{Fault, Status};
///
/// let fault = Fault::new("");
/// assert_eq!(fault.status(), Status::InternalServerError);
/// assert_eq!(fault.message(), "Something went wrong.");
///
/// let fault = Fault::not_found("Page not found");
/// assert_eq!(fault.status(), Status::NotFound);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fault {
    status: Status,
    message: String,
}

impl Fault {
    /// Shown whenever a fault was raised without a message.
    pub const GENERIC_MESSAGE: &'static str = "Something went wrong.";

    /// A fault with the default status, `500 Internal Server Error`.
    pub fn new(message: impl Into<String>) -> Self {
        Self { status: Status::default(), message: message.into() }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// `400 Bad Request`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message).with_status(Status::BadRequest)
    }

    /// `404 Not Found`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).with_status(Status::NotFound)
    }

    /// `413 Content Too Large`.
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(message).with_status(Status::PayloadTooLarge)
    }

    /// `500 Internal Server Error`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The message to show the user. Never empty.
    pub fn message(&self) -> &str {
        if self.message.trim().is_empty() {
            Self::GENERIC_MESSAGE
        } else {
            &self.message
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message())
    }
}

impl std::error::Error for Fault {}
