//! HTML forms can only `GET` and `POST`. A `POST` carrying `_method=PUT` (or
//! `DELETE`, …) in its query string is routed as that method instead.

use crate::fault::Fault;
use crate::method::Method;
use crate::request::Request;

/// Query-string key holding the overriding method.
pub const OVERRIDE_KEY: &str = "_method";

/// Rewrites the method of an overridden `POST`. Never faults: an unknown
/// override value is ignored and the request stays a `POST`.
pub fn method_override(req: Request) -> Result<Request, Fault> {
    if req.method() != Method::Post {
        return Ok(req);
    }
    let Some(value) = req.query_param(OVERRIDE_KEY) else {
        return Ok(req);
    };
    match value.to_ascii_uppercase().parse::<Method>() {
        Ok(method) => {
            tracing::debug!(%method, "method overridden");
            Ok(req.with_method(method))
        }
        Err(()) => Ok(req),
    }
}
