//! Middleware layer.
//!
//! Middleware here is an explicit, ordered [`Chain`] of plain functions. Each
//! [`Step`] takes the request by value and either hands back the (possibly
//! rewritten) request to continue, or a [`Fault`] to short-circuit straight to
//! the terminal fault handler. There is no shared mutable context and no
//! "next" callback to forget to call.
//!
//! Two chains run per request:
//!
//! - the router-wide chain, before route lookup (e.g. [`method_override`],
//!   which must run before the method tree is picked, and [`decode_body`]);
//! - the per-route guard chain, after lookup, with path parameters filled in
//!   (e.g. schema validation on the mutating routes).
//!
//! Built-in steps:
//! - [`method_override`]: `POST ?_method=PUT` routed as `PUT`
//! - [`decode_body`]: form / JSON body into [`Request::payload`], capped at
//!   [`MAX_BODY_BYTES`]
//!
//! Request tracing lives in [`trace`]; it wraps the whole dispatch rather
//! than being a step, since it must observe the final response.

mod body;
mod method_override;
pub mod trace;

pub use body::{MAX_BODY_BYTES, decode_body};
pub(crate) use body::too_large;
pub use method_override::{OVERRIDE_KEY, method_override};

use crate::fault::Fault;
use crate::request::Request;

/// One pipeline stage: continue with a request, or stop with a fault.
pub type Step = fn(Request) -> Result<Request, Fault>;

/// An ordered sequence of [`Step`]s, composed left to right.
///
/// ```rust
/// use campsite::middleware::{Chain, decode_body, method_override};
/// use campsite::{Method, Request};
///
/// let chain = Chain::new().then(method_override).then(decode_body);
/// let req = chain.run(Request::new(Method::Post, "/x?_method=DELETE")).unwrap();
/// assert_eq!(req.method(), Method::Delete);
/// ```
#[derive(Clone, Default)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends `step` to the end of the chain. Returns `self` for chaining.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order, stopping at the first fault.
    pub fn run(&self, req: Request) -> Result<Request, Fault> {
        self.steps.iter().try_fold(req, |req, step| step(req))
    }
}
