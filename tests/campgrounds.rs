//! End-to-end behaviour of the campground routes, driven in-process through
//! `Router::dispatch`.

use std::sync::Arc;

use async_trait::async_trait;
use campsite::campground::{Campground, CampgroundDraft, CampgroundId};
use campsite::controller::AppState;
use campsite::middleware::MAX_BODY_BYTES;
use campsite::store::{CampgroundStore, MemoryStore, StoreError};
use campsite::{Method, Request, Response, Router, Status};
use rstest::rstest;

const FORM: &str = "application/x-www-form-urlencoded";

fn app() -> Router<AppState> {
    campsite::app(Arc::new(MemoryStore::new()))
}

fn text(res: &Response) -> String {
    String::from_utf8_lossy(res.body()).into_owned()
}

fn form_post(target: &str, body: &str) -> Request {
    Request::new(Method::Post, target)
        .header("content-type", FORM)
        .body(body.to_owned())
}

fn camp_form(title: &str, price: &str, description: &str, location: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("camp[title]", title)
        .append_pair("camp[price]", price)
        .append_pair("camp[description]", description)
        .append_pair("camp[location]", location)
        .finish()
}

async fn get(app: &Router<AppState>, target: &str) -> Response {
    app.dispatch(Request::new(Method::Get, target)).await
}

/// Creates a campground and returns its detail path.
async fn create(app: &Router<AppState>, title: &str, price: &str) -> String {
    let res = app
        .dispatch(form_post("/campgrounds/new", &camp_form(title, price, "quiet", "CO")))
        .await;
    assert_eq!(res.status_code(), Status::Found, "{}", text(&res));
    res.header("location").expect("redirect location").to_owned()
}

#[tokio::test]
async fn home_and_forms_render() {
    let app = app();
    for target in ["/", "/campgrounds", "/campgrounds/new"] {
        let res = get(&app, target).await;
        assert_eq!(res.status_code(), Status::Ok, "{target}");
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    }
}

#[tokio::test]
async fn create_redirects_to_detail_with_submitted_values() {
    let app = app();
    let location = create(&app, "Pine Ridge", "25").await;

    let id = location.strip_prefix("/campgrounds/").expect("detail path");
    assert!(id.parse::<CampgroundId>().is_ok(), "{location}");

    let page = get(&app, &location).await;
    assert_eq!(page.status_code(), Status::Ok);
    let html = text(&page);
    assert!(html.contains("Pine Ridge"));
    assert!(html.contains("25"));
    assert!(html.contains("quiet"));
    assert!(html.contains("CO"));
}

#[tokio::test]
async fn json_create_is_accepted() {
    let app = app();
    let req = Request::new(Method::Post, "/campgrounds/new")
        .header("content-type", "application/json")
        .body(r#"{"camp":{"title":"Pine Ridge","price":25,"description":"quiet","location":"CO"}}"#);
    let res = app.dispatch(req).await;
    assert_eq!(res.status_code(), Status::Found);
}

#[tokio::test]
async fn invalid_create_lists_every_violation() {
    let app = app();
    let req = Request::new(Method::Post, "/campgrounds/new")
        .header("content-type", "application/json")
        .body(r#"{"camp":{"title":"","price":-5}}"#);
    let res = app.dispatch(req).await;

    assert_eq!(res.status_code(), Status::BadRequest);
    let html = text(&res);
    for field in ["camp.title", "camp.price", "camp.description", "camp.location"] {
        assert!(html.contains(field), "missing {field} in {html}");
    }
    assert!(text(&get(&app, "/campgrounds").await).contains("No campgrounds yet."));
}

#[rstest]
#[case("camp[title]=x")]
#[case("")]
#[tokio::test]
async fn incomplete_form_is_rejected(#[case] body: &str) {
    let app = app();
    let res = app.dispatch(form_post("/campgrounds/new", body)).await;
    assert_eq!(res.status_code(), Status::BadRequest);
    assert!(text(&res).contains("is required"));
}

#[tokio::test]
async fn update_goes_through_method_override() {
    let app = app();
    let location = create(&app, "Pine Ridge", "25").await;

    let res = app
        .dispatch(form_post(
            &format!("{location}/edit?_method=PUT"),
            &camp_form("Aspen Flat", "30", "breezy", "WY"),
        ))
        .await;
    assert_eq!(res.status_code(), Status::Found);
    assert_eq!(res.header("location"), Some(location.as_str()));

    let html = text(&get(&app, &location).await);
    assert!(html.contains("Aspen Flat"));
    assert!(html.contains("WY"));
    assert!(!html.contains("Pine Ridge"));
}

#[tokio::test]
async fn update_with_current_values_changes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let app = campsite::app(store.clone());
    let location = create(&app, "Pine Ridge", "25.5").await;
    let before = store.find_all().await.unwrap();
    let current = before[0].to_draft();

    let res = app
        .dispatch(form_post(
            &format!("{location}/edit?_method=PUT"),
            &camp_form(&current.title, &current.price.to_string(), &current.description, &current.location),
        ))
        .await;
    assert_eq!(res.status_code(), Status::Found);
    assert_eq!(store.find_all().await.unwrap(), before);
}

#[tokio::test]
async fn invalid_update_is_rejected_and_keeps_record() {
    let app = app();
    let location = create(&app, "Pine Ridge", "25").await;

    let res = app
        .dispatch(form_post(&format!("{location}/edit?_method=PUT"), "camp[title]="))
        .await;
    assert_eq!(res.status_code(), Status::BadRequest);
    assert!(text(&get(&app, &location).await).contains("Pine Ridge"));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = app();
    let location = create(&app, "Doomed Meadow", "10").await;
    let kept = create(&app, "Kept Hollow", "12").await;

    for _ in 0..2 {
        let res = app
            .dispatch(Request::new(Method::Post, &format!("{location}?_method=DELETE")))
            .await;
        assert_eq!(res.status_code(), Status::Found);
        assert_eq!(res.header("location"), Some("/campgrounds"));
    }

    let list = text(&get(&app, "/campgrounds").await);
    assert!(!list.contains("Doomed Meadow"));
    assert!(list.contains("Kept Hollow"));
    assert_eq!(get(&app, &location).await.status_code(), Status::NotFound);
    assert_eq!(get(&app, &kept).await.status_code(), Status::Ok);
}

#[tokio::test]
async fn oversized_form_is_refused_and_nothing_is_stored() {
    let store = Arc::new(MemoryStore::new());
    let app = campsite::app(store.clone());
    let huge_title = "a".repeat(MAX_BODY_BYTES);

    let res = app
        .dispatch(form_post("/campgrounds/new", &camp_form(&huge_title, "25", "quiet", "CO")))
        .await;

    assert_eq!(res.status_code(), Status::PayloadTooLarge);
    assert!(text(&res).contains("413 Content Too Large"));
    assert!(store.find_all().await.unwrap().is_empty());
}

#[rstest]
#[case("/campgrounds/")]
#[case("/campgrounds/new/")]
#[tokio::test]
async fn trailing_slash_reaches_the_same_page(#[case] target: &str) {
    let res = get(&app(), target).await;
    assert_eq!(res.status_code(), Status::Ok);
}

#[tokio::test]
async fn head_answers_like_get_without_a_body() {
    let app = app();
    let location = create(&app, "Pine Ridge", "25").await;

    for target in ["/campgrounds", location.as_str()] {
        let res = app.dispatch(Request::new(Method::Head, target)).await;
        assert_eq!(res.status_code(), Status::Ok, "{target}");
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(res.body().is_empty());
    }
}

#[rstest]
#[case(Method::Get, "/nowhere")]
#[case(Method::Get, "/campgrounds/new/extra")]
#[case(Method::Patch, "/campgrounds")]
#[case(Method::Post, "/campgrounds")]
#[tokio::test]
async fn undefined_routes_are_not_found(#[case] method: Method, #[case] target: &str) {
    let res = app().dispatch(Request::new(method, target)).await;
    assert_eq!(res.status_code(), Status::NotFound);
    assert!(text(&res).contains("Page not found"));
}

#[rstest]
#[case("/campgrounds/not-a-uuid")]
#[case("/campgrounds/67e55044-10b1-426f-9247-bb680e5fe0c8")]
#[case("/campgrounds/67e55044-10b1-426f-9247-bb680e5fe0c8/edit")]
#[tokio::test]
async fn unknown_campground_is_not_found(#[case] target: &str) {
    let res = get(&app(), target).await;
    assert_eq!(res.status_code(), Status::NotFound);
    assert!(text(&res).contains("Campground not found"));
}

#[tokio::test]
async fn update_of_unknown_campground_is_not_found() {
    let res = app()
        .dispatch(form_post(
            "/campgrounds/67e55044-10b1-426f-9247-bb680e5fe0c8/edit?_method=PUT",
            &camp_form("t", "1", "d", "l"),
        ))
        .await;
    assert_eq!(res.status_code(), Status::NotFound);
}

/// A store whose backend is always down.
struct BrokenStore;

fn down() -> StoreError {
    StoreError::Io(std::io::Error::other("disk on fire"))
}

#[async_trait]
impl CampgroundStore for BrokenStore {
    async fn find_all(&self) -> Result<Vec<Campground>, StoreError> {
        Err(down())
    }

    async fn find_by_id(&self, _id: CampgroundId) -> Result<Option<Campground>, StoreError> {
        Err(down())
    }

    async fn insert(&self, _draft: CampgroundDraft) -> Result<Campground, StoreError> {
        Err(down())
    }

    async fn update(
        &self,
        _id: CampgroundId,
        _draft: CampgroundDraft,
    ) -> Result<Option<Campground>, StoreError> {
        Err(down())
    }

    async fn remove(&self, _id: CampgroundId) -> Result<Option<Campground>, StoreError> {
        Err(down())
    }
}

#[tokio::test]
async fn store_failures_render_an_internal_error_page() {
    let app = campsite::app(Arc::new(BrokenStore));

    let res = get(&app, "/campgrounds").await;
    assert_eq!(res.status_code(), Status::InternalServerError);
    assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    assert!(text(&res).contains("500 Internal Server Error"));

    let res = app
        .dispatch(form_post("/campgrounds/new", &camp_form("t", "1", "d", "l")))
        .await;
    assert_eq!(res.status_code(), Status::InternalServerError);
}

#[tokio::test]
async fn validation_runs_before_the_store_is_touched() {
    let app = campsite::app(Arc::new(BrokenStore));
    let res = app.dispatch(form_post("/campgrounds/new", "camp[title]=x")).await;
    assert_eq!(res.status_code(), Status::BadRequest);
}
