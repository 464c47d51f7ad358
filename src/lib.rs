//! # campsite
//!
//! A server-rendered campground directory: list, view, create, edit and
//! delete campgrounds, rendered as HTML pages.
//!
//! ## How a request flows
//!
//! ```text
//! hyper ─▶ Router::dispatch
//!            ├─ method_override, decode_body     (router-wide steps)
//!            ├─ radix-tree lookup                (miss → 404 fault)
//!            ├─ validate_campground              (create / update only)
//!            ├─ handler ─▶ CampgroundStore       (Err or panic → fault)
//!            └─ Reply::Render / Reply::Redirect
//!
//! any fault ─▶ controller::render_fault          (the only error page)
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use campsite::{Server, store::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = campsite::app(Arc::new(MemoryStore::new()));
//!     let addr = "0.0.0.0:3000".parse().unwrap();
//!     Server::bind(addr).serve(app).await.unwrap();
//! }
//! ```
//!
//! The router can also be driven in-process, which is how the integration
//! tests exercise it:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use campsite::{Method, Request, Status, store::MemoryStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let app = campsite::app(Arc::new(MemoryStore::new()));
//! let res = app.dispatch(Request::new(Method::Get, "/nowhere")).await;
//! assert_eq!(res.status_code(), Status::NotFound);
//! # });
//! ```

use std::sync::Arc;

mod error;
mod fault;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod campground;
pub mod config;
pub mod controller;
pub mod middleware;
pub mod schema;
pub mod store;
pub mod views;

pub use error::Error;
pub use fault::Fault;
pub use handler::{Handler, catch_faults};
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{FaultHandler, Router};
pub use server::Server;
pub use status::Status;

use controller::AppState;
use middleware::{Chain, decode_body, method_override};
use schema::validate_campground;
use store::CampgroundStore;

/// The campsite route table over `store`.
pub fn app(store: Arc<dyn CampgroundStore>) -> Router<AppState> {
    let validated = Chain::new().then(validate_campground);

    Router::new(AppState::new(store))
        .before(method_override)
        .before(decode_body)
        .on(Method::Get,    "/",                       controller::home)
        .on(Method::Get,    "/campgrounds",            controller::index)
        .on(Method::Get,    "/campgrounds/new",        controller::new_form)
        .on_guarded(Method::Post, "/campgrounds/new",  validated.clone(), controller::create)
        .on(Method::Get,    "/campgrounds/{id}",       controller::show)
        .on(Method::Get,    "/campgrounds/{id}/edit",  controller::edit_form)
        .on_guarded(Method::Put,  "/campgrounds/{id}/edit", validated, controller::update)
        .on(Method::Delete, "/campgrounds/{id}",       controller::destroy)
        .catch(controller::render_fault)
}
