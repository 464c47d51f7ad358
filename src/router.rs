//! Radix-tree request router with a request pipeline and a terminal fault
//! handler.
//!
//! One tree per HTTP method. O(path-length) lookup. A request travels:
//!
//! ```text
//! router-wide chain ─▶ lookup ─▶ route guards ─▶ handler ─▶ Response
//!        │               │            │             │
//!        └───────────────┴─── Fault ──┴─────────────┴──▶ terminal fault handler
//! ```
//!
//! A lookup miss (unknown path, or a known path under another method) is a
//! `404 Page not found` fault like any other. Two lenient matches apply first:
//! a trailing slash is ignored (`/campgrounds/` is `/campgrounds`), and a
//! `HEAD` with no route of its own runs the `GET` route and drops the body.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::fault::Fault;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Chain, Step, trace};
use crate::request::Request;
use crate::response::Response;

/// Turns a fault into the page the user sees. Installed with
/// [`Router::catch`].
pub type FaultHandler = fn(Fault) -> Response;

/// Message of the fault raised for any unmatched route.
pub const NOT_FOUND_MESSAGE: &str = "Page not found";

struct Route<S> {
    guards: Chain,
    handler: BoxedHandler<S>,
}

/// The application router.
///
/// Owns the application state `S`, cloned into each handler call. Build it
/// once at startup; pass it to [`Server::serve`](crate::Server::serve), or
/// call [`Router::dispatch`] directly.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<Arc<Route<S>>>>,
    before: Chain,
    catch: FaultHandler,
    state: S,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(state: S) -> Self {
        Self {
            routes: HashMap::new(),
            before: Chain::new(),
            catch: plain_fault,
            state,
        }
    }

    /// Appends a router-wide step, run on every request before lookup.
    pub fn before(mut self, step: Step) -> Self {
        self.before = self.before.then(step);
        self
    }

    /// Installs the terminal fault handler. Defaults to a plain-text page.
    pub fn catch(mut self, handler: FaultHandler) -> Self {
        self.catch = handler;
        self
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or collides with one already
    /// registered. Routes are fixed at startup, so this is a programming error.
    pub fn on(self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.add(method, path, Chain::new(), handler)
    }

    /// Like [`on`](Router::on), with `guards` run after lookup and before the
    /// handler.
    pub fn on_guarded(
        self,
        method: Method,
        path: &str,
        guards: Chain,
        handler: impl Handler<S>,
    ) -> Self {
        self.add(method, path, guards, handler)
    }

    fn add(mut self, method: Method, path: &str, guards: Chain, handler: impl Handler<S>) -> Self {
        let route = Arc::new(Route { guards, handler: handler.into_boxed_handler() });
        self.routes
            .entry(method)
            .or_default()
            .insert(path, route)
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Routes one request and produces one response. Never fails: every
    /// fault ends in the terminal fault handler.
    pub async fn dispatch(&self, req: Request) -> Response {
        let method = req.method();
        let path = req.path().to_owned();
        trace::traced(method.as_str(), &path, async {
            let response = match self.respond(req).await {
                Ok(response) => response,
                Err(fault) => self.fault(fault),
            };
            if method == Method::Head { response.without_body() } else { response }
        })
        .await
    }

    /// Hands `fault` to the terminal fault handler.
    pub fn fault(&self, fault: Fault) -> Response {
        (self.catch)(fault)
    }

    async fn respond(&self, req: Request) -> Result<Response, Fault> {
        let req = self.before.run(req)?;
        let (route, params) = self
            .lookup(req.method(), req.path())
            .ok_or_else(|| Fault::not_found(NOT_FOUND_MESSAGE))?;
        let req = route.guards.run(req.with_params(params))?;
        route.handler.call(self.state.clone(), req).await
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(Arc<Route<S>>, HashMap<String, String>)> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        self.lookup_exact(method, path).or_else(|| match method {
            Method::Head => self.lookup_exact(Method::Get, path),
            _ => None,
        })
    }

    fn lookup_exact(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(Arc<Route<S>>, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let route = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((route, params))
    }
}

fn plain_fault(fault: Fault) -> Response {
    Response::builder()
        .status(fault.status())
        .text(fault.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    async fn echo_id(_state: (), req: Request) -> Result<String, Fault> {
        Ok(format!("id={}", req.param("id").unwrap_or_default()))
    }

    async fn unreachable_handler(_state: (), _req: Request) -> Result<&'static str, Fault> {
        panic!("guard should have stopped the request");
    }

    fn deny(_req: Request) -> Result<Request, Fault> {
        Err(Fault::bad_request("denied"))
    }

    fn test_router() -> Router<()> {
        Router::new(())
            .on(Method::Get, "/items/{id}", echo_id)
            .on_guarded(Method::Post, "/items", Chain::new().then(deny), unreachable_handler)
    }

    #[tokio::test]
    async fn matched_route_receives_params() {
        let res = test_router().dispatch(Request::new(Method::Get, "/items/42")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), b"id=42");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let res = test_router().dispatch(Request::new(Method::Get, "/nope")).await;
        assert_eq!(res.status_code(), Status::NotFound);
        assert_eq!(res.body(), NOT_FOUND_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn wrong_method_is_not_found() {
        let res = test_router().dispatch(Request::new(Method::Delete, "/items/42")).await;
        assert_eq!(res.status_code(), Status::NotFound);
    }

    #[tokio::test]
    async fn guard_fault_reaches_catch_handler() {
        fn teapot_page(fault: Fault) -> Response {
            Response::builder().status(fault.status()).text(format!("caught: {}", fault.message()))
        }
        let router = test_router().catch(teapot_page);
        let res = router.dispatch(Request::new(Method::Post, "/items")).await;
        assert_eq!(res.status_code(), Status::BadRequest);
        assert_eq!(res.body(), b"caught: denied");
    }

    #[tokio::test]
    async fn router_wide_steps_run_before_lookup() {
        fn rewrite(req: Request) -> Result<Request, Fault> {
            Ok(req.with_method(Method::Get))
        }
        let router = test_router().before(rewrite);
        let res = router.dispatch(Request::new(Method::Delete, "/items/7")).await;
        assert_eq!(res.body(), b"id=7");
    }

    #[tokio::test]
    async fn trailing_slash_matches_the_same_route() {
        let res = test_router().dispatch(Request::new(Method::Get, "/items/42/")).await;
        assert_eq!(res.body(), b"id=42");

        let root = Router::new(()).on(Method::Get, "/", echo_id);
        let res = root.dispatch(Request::new(Method::Get, "/")).await;
        assert_eq!(res.status_code(), Status::Ok);
    }

    #[tokio::test]
    async fn head_runs_the_get_route_without_a_body() {
        let res = test_router().dispatch(Request::new(Method::Head, "/items/42")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert!(res.body().is_empty());
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));

        let res = test_router().dispatch(Request::new(Method::Head, "/nope")).await;
        assert_eq!(res.status_code(), Status::NotFound);
        assert!(res.body().is_empty());
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic_at_startup() {
        let _ = Router::new(())
            .on(Method::Get, "/items/{id}", echo_id)
            .on(Method::Get, "/items/{key}", echo_id);
    }
}
