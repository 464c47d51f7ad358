//! The campground document and its identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::fault::Fault;
use crate::schema::CAMPGROUND;

/// Store-assigned identity of a [`Campground`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampgroundId(Uuid);

impl CampgroundId {
    /// A fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CampgroundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CampgroundId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A persisted campground.
///
/// Serialized as a document with the identifier under `_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campground {
    #[serde(rename = "_id")]
    pub id: CampgroundId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub location: String,
}

impl Campground {
    pub fn from_draft(id: CampgroundId, draft: CampgroundDraft) -> Self {
        let CampgroundDraft { title, price, description, location } = draft;
        Self { id, title, price, description, location }
    }

    /// The fields without the identity, e.g. to re-submit them unchanged.
    pub fn to_draft(&self) -> CampgroundDraft {
        CampgroundDraft {
            title: self.title.clone(),
            price: self.price,
            description: self.description.clone(),
            location: self.location.clone(),
        }
    }

    /// Path of the detail page, `/campgrounds/{id}`.
    pub fn path(&self) -> String {
        format!("/campgrounds/{}", self.id)
    }
}

/// The user-supplied fields of a campground, prior to being given an id.
///
/// Stores only accept drafts, and check them against the campground schema
/// before every write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CampgroundDraft {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub location: String,
}

impl CampgroundDraft {
    /// Reads the draft out of a validated request payload (`{"camp": {...}}`).
    ///
    /// Faults with `400` when the payload does not hold a well-typed draft,
    /// which can only happen if the validation guard did not run.
    pub fn from_payload(payload: Option<&Value>) -> Result<Self, Fault> {
        let camp = payload
            .and_then(|p| p.get(CAMPGROUND.root()))
            .ok_or_else(|| Fault::bad_request(format!("\"{}\" is required", CAMPGROUND.root())))?;
        Self::deserialize(camp).map_err(|e| Fault::bad_request(e.to_string()))
    }
}

/// Renders a price without a trailing `.0` for whole amounts.
pub fn format_price(price: f64) -> String {
    price.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_uses_underscore_id() {
        let id: CampgroundId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        let camp = Campground::from_draft(id, CampgroundDraft {
            title: "Pine Ridge".into(),
            price: 25.0,
            description: "quiet".into(),
            location: "CO".into(),
        });
        let doc = serde_json::to_value(&camp).unwrap();
        assert_eq!(doc["_id"], json!("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert_eq!(camp.path(), "/campgrounds/67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(serde_json::from_value::<Campground>(doc).unwrap(), camp);
    }

    #[test]
    fn draft_is_read_from_camp_key() {
        let payload = json!({"camp": {"title": "t", "price": 3.5, "description": "d", "location": "l"}});
        let draft = CampgroundDraft::from_payload(Some(&payload)).unwrap();
        assert_eq!(draft.price, 3.5);
    }

    #[test]
    fn draft_without_camp_is_a_bad_request() {
        let fault = CampgroundDraft::from_payload(Some(&json!({}))).unwrap_err();
        assert_eq!(fault.message(), "\"camp\" is required");
    }

    #[test]
    fn whole_prices_print_without_fraction() {
        assert_eq!(format_price(25.0), "25");
        assert_eq!(format_price(12.5), "12.5");
    }

    #[test]
    fn malformed_id_does_not_parse() {
        assert!("not-a-uuid".parse::<CampgroundId>().is_err());
    }
}
