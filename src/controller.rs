//! Campground routes: one store call each, then a view or a redirect.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | `GET` | `/` | [`home`] |
//! | `GET` | `/campgrounds` | [`index`] |
//! | `GET` | `/campgrounds/new` | [`new_form`] |
//! | `POST` | `/campgrounds/new` | [`create`] (validated) |
//! | `GET` | `/campgrounds/{id}` | [`show`] |
//! | `GET` | `/campgrounds/{id}/edit` | [`edit_form`] |
//! | `PUT` | `/campgrounds/{id}/edit` | [`update`] (validated) |
//! | `DELETE` | `/campgrounds/{id}` | [`destroy`] |
//!
//! Handlers never render failures themselves: they return a [`Fault`] and
//! [`render_fault`], the router's terminal fault handler, draws the page.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::campground::{CampgroundDraft, CampgroundId};
use crate::fault::Fault;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::store::CampgroundStore;
use crate::views::{self, View};

/// Message of the fault raised when an id names no campground.
pub const CAMPGROUND_NOT_FOUND: &str = "Campground not found";

/// Router state: the injected store handle.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn CampgroundStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CampgroundStore>) -> Self {
        Self { store }
    }
}

/// What a successful handler asks for.
#[derive(Debug)]
pub enum Reply {
    /// `200 OK` with the rendered view.
    Render(View),
    /// `302 Found` to the given path.
    Redirect(String),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Render(view) => Response::html(views::render(&view)),
            Reply::Redirect(location) => Response::redirect(&location),
        }
    }
}

type Outcome = Result<Reply, Fault>;

pub async fn home(_state: AppState, _req: Request) -> Outcome {
    Ok(Reply::Render(View::Home))
}

pub async fn index(state: AppState, _req: Request) -> Outcome {
    let camps = state.store.find_all().await?;
    Ok(Reply::Render(View::Index(camps)))
}

pub async fn new_form(_state: AppState, _req: Request) -> Outcome {
    Ok(Reply::Render(View::New))
}

pub async fn create(state: AppState, req: Request) -> Outcome {
    let draft = CampgroundDraft::from_payload(req.payload())?;
    let camp = state.store.insert(draft).await?;
    info!(id = %camp.id, title = %camp.title, "campground created");
    Ok(Reply::Redirect(camp.path()))
}

pub async fn show(state: AppState, req: Request) -> Outcome {
    let id = campground_id(&req)?;
    let camp = state.store.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Reply::Render(View::Show(camp)))
}

pub async fn edit_form(state: AppState, req: Request) -> Outcome {
    let id = campground_id(&req)?;
    let camp = state.store.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Reply::Render(View::Edit(camp)))
}

pub async fn update(state: AppState, req: Request) -> Outcome {
    let id = campground_id(&req)?;
    let draft = CampgroundDraft::from_payload(req.payload())?;
    let camp = state.store.update(id, draft).await?.ok_or_else(not_found)?;
    info!(id = %camp.id, "campground updated");
    Ok(Reply::Redirect(camp.path()))
}

/// Deleting an absent campground still redirects to the list.
pub async fn destroy(state: AppState, req: Request) -> Outcome {
    let id = campground_id(&req)?;
    match state.store.remove(id).await? {
        Some(camp) => info!(id = %camp.id, "campground deleted"),
        None => debug!(%id, "delete of absent campground"),
    }
    Ok(Reply::Redirect("/campgrounds".to_owned()))
}

/// Terminal fault handler: the only place a fault becomes a page.
pub fn render_fault(fault: Fault) -> Response {
    if fault.status().is_server_error() {
        error!(status = fault.status().code(), message = fault.message(), "request failed");
    } else {
        debug!(status = fault.status().code(), message = fault.message(), "request rejected");
    }
    Response::builder()
        .status(fault.status())
        .html(views::render(&View::Error(fault)))
}

/// An id that does not parse cannot name a campground, so it is a 404 too.
fn campground_id(req: &Request) -> Result<CampgroundId, Fault> {
    req.param("id")
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(not_found)
}

fn not_found() -> Fault {
    Fault::not_found(CAMPGROUND_NOT_FOUND)
}
