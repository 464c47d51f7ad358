//! HTML views, compiled with [`maud`].
//!
//! A [`View`] names a page and carries exactly the data it needs; [`render`]
//! is the only way to turn one into markup. Every page shares [`layout`].

use maud::{DOCTYPE, Markup, html};

use crate::campground::{Campground, format_price};
use crate::fault::Fault;
use crate::middleware::OVERRIDE_KEY;

/// A renderable page.
#[derive(Clone, Debug)]
pub enum View {
    Home,
    Index(Vec<Campground>),
    New,
    Show(Campground),
    Edit(Campground),
    Error(Fault),
}

/// Renders `view` inside the shared layout.
pub fn render(view: &View) -> Markup {
    match view {
        View::Home => layout("YelpCamp", home()),
        View::Index(camps) => layout("All Campgrounds", index(camps)),
        View::New => layout("New Campground", new_form()),
        View::Show(camp) => layout(&camp.title, show(camp)),
        View::Edit(camp) => layout(&format!("Edit {}", camp.title), edit_form(camp)),
        View::Error(fault) => layout("Error", error(fault)),
    }
}

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | YelpCamp" }
            }
            body {
                nav {
                    a href="/" { "YelpCamp" }
                    " "
                    a href="/campgrounds" { "Campgrounds" }
                    " "
                    a href="/campgrounds/new" { "New Campground" }
                }
                main { (content) }
            }
        }
    }
}

fn home() -> Markup {
    html! {
        h1 { "YelpCamp" }
        p { "Find a place to pitch your tent." }
        a href="/campgrounds" { "View campgrounds" }
    }
}

fn index(camps: &[Campground]) -> Markup {
    html! {
        h1 { "All Campgrounds" }
        @if camps.is_empty() {
            p { "No campgrounds yet." }
        } @else {
            ul {
                @for camp in camps {
                    li {
                        a href=(camp.path()) { (camp.title) }
                        " - " (camp.location)
                    }
                }
            }
        }
        a href="/campgrounds/new" { "Add a campground" }
    }
}

fn show(camp: &Campground) -> Markup {
    html! {
        h1 { (camp.title) }
        p.location { (camp.location) }
        p.price { "$" (format_price(camp.price)) " / night" }
        p.description { (camp.description) }
        a href={ (camp.path()) "/edit" } { "Edit" }
        form action={ (camp.path()) "?" (OVERRIDE_KEY) "=DELETE" } method="POST" {
            button { "Delete" }
        }
        a href="/campgrounds" { "All campgrounds" }
    }
}

fn new_form() -> Markup {
    html! {
        h1 { "New Campground" }
        form action="/campgrounds/new" method="POST" {
            (fields(None))
            button { "Add Campground" }
        }
        a href="/campgrounds" { "All campgrounds" }
    }
}

fn edit_form(camp: &Campground) -> Markup {
    html! {
        h1 { "Edit Campground" }
        form action={ (camp.path()) "/edit?" (OVERRIDE_KEY) "=PUT" } method="POST" {
            (fields(Some(camp)))
            button { "Update Campground" }
        }
        a href=(camp.path()) { "Back to campground" }
    }
}

/// The four `camp[...]` inputs, pre-filled when editing.
fn fields(camp: Option<&Campground>) -> Markup {
    let title = camp.map(|c| c.title.as_str()).unwrap_or_default();
    let location = camp.map(|c| c.location.as_str()).unwrap_or_default();
    let price = camp.map(|c| format_price(c.price)).unwrap_or_default();
    let description = camp.map(|c| c.description.as_str()).unwrap_or_default();
    html! {
        label for="title" { "Title" }
        input id="title" type="text" name="camp[title]" value=(title) required;
        label for="location" { "Location" }
        input id="location" type="text" name="camp[location]" value=(location) required;
        label for="price" { "Price" }
        input id="price" type="number" name="camp[price]" min="0" step="0.01" value=(price) required;
        label for="description" { "Description" }
        textarea id="description" name="camp[description]" required { (description) }
    }
}

fn error(fault: &Fault) -> Markup {
    html! {
        h1 { (fault.status().code()) " " (fault.status().reason()) }
        p.error { (fault.message()) }
        a href="/campgrounds" { "Back to campgrounds" }
    }
}
