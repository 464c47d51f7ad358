//! Request body decoding.
//!
//! Turns the raw body into a JSON document stored as the request payload.
//! URL-encoded forms use bracket notation for nesting, so
//! `camp[title]=Pine+Ridge&camp[price]=25` becomes
//! `{"camp": {"title": "Pine Ridge", "price": "25"}}`. Form values are always
//! strings; type coercion is the schema's job.
//!
//! Bodies larger than [`MAX_BODY_BYTES`] are refused with `413`.

use serde_json::{Map, Value};

use crate::fault::Fault;
use crate::request::Request;

/// Largest body accepted, in bytes (100 KiB).
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Decodes the body by content type:
///
/// - `application/json` → parsed document, `400` if malformed
/// - `application/x-www-form-urlencoded`, or no content type → nested form
/// - anything else → empty object
pub fn decode_body(req: Request) -> Result<Request, Fault> {
    if req.raw_body().len() > MAX_BODY_BYTES {
        return Err(too_large());
    }

    let media_type = req.header_value("content-type")
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase());

    let payload = match media_type.as_deref() {
        Some("application/json") if !req.raw_body().is_empty() => {
            serde_json::from_slice(req.raw_body())
                .map_err(|e| Fault::bad_request(format!("Malformed JSON body: {e}")))?
        }
        None | Some("application/x-www-form-urlencoded") => decode_form(req.raw_body()),
        _ => Value::Object(Map::new()),
    };

    Ok(req.with_payload(payload))
}

pub(crate) fn too_large() -> Fault {
    Fault::payload_too_large(format!("Request body exceeds {MAX_BODY_BYTES} bytes"))
}

fn decode_form(body: &[u8]) -> Value {
    let mut root = Map::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        insert_nested(&mut root, &key_path(&key), Value::String(value.into_owned()));
    }
    Value::Object(root)
}

/// Splits `camp[title]` into `["camp", "title"]`. A key whose brackets do not
/// balance is taken literally.
fn key_path(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_owned()];
    };
    let (head, mut rest) = key.split_at(open);
    let mut path = vec![head.to_owned()];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            return vec![key.to_owned()];
        };
        path.push(inner[..close].to_owned());
        rest = &inner[close + 1..];
    }
    if rest.is_empty() && !head.is_empty() {
        path
    } else {
        vec![key.to_owned()]
    }
}

/// Last write wins. A scalar in the way of a nested key is replaced by an
/// object.
fn insert_nested(map: &mut Map<String, Value>, path: &[String], value: Value) {
    match path {
        [] => {}
        [last] => {
            map.insert(last.clone(), value);
        }
        [head, tail @ ..] => {
            let slot = map.entry(head.clone()).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                insert_nested(child, tail, value);
            }
        }
    }
}
