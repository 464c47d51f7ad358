//! Declarative payload schema and the validation guard built on it.
//!
//! The schema describes the one shape campsite accepts on create and update:
//!
//! ```text
//! {
//!   "camp": {                       required object, no other keys
//!     "title":       non-empty string,
//!     "price":       number >= 0    (numeric strings are converted),
//!     "description": non-empty string,
//!     "location":    non-empty string
//!   }
//! }
//! ```
//!
//! Validation is total: every field is checked and every violation reported,
//! joined with `,` into a single `400` fault.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::fault::Fault;
use crate::request::Request;

/// The campground payload schema.
pub static CAMPGROUND: Schema = Schema {
    root: "camp",
    fields: &[
        Field::text("title"),
        Field::number("price", 0.0),
        Field::text("description"),
        Field::text("location"),
    ],
};

/// What a field must hold.
#[derive(Clone, Copy, Debug)]
pub enum Rule {
    /// A non-empty string.
    Text,
    /// A finite number no smaller than `min`. Strings that parse as numbers
    /// are accepted and converted.
    Number { min: f64 },
}

/// One required field of the root object.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    name: &'static str,
    rule: Rule,
}

impl Field {
    pub const fn text(name: &'static str) -> Self {
        Self { name, rule: Rule::Text }
    }

    pub const fn number(name: &'static str, min: f64) -> Self {
        Self { name, rule: Rule::Number { min } }
    }
}

/// A payload shape: a required root object with a fixed set of required
/// fields.
#[derive(Debug)]
pub struct Schema {
    root: &'static str,
    fields: &'static [Field],
}

/// Every way a payload failed its schema, in field order.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{}", .0.join(","))]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// All messages joined with `,`.
    pub fn message(&self) -> String {
        self.0.join(",")
    }
}

impl From<Violations> for Fault {
    fn from(v: Violations) -> Self {
        Fault::bad_request(v.message())
    }
}

impl Schema {
    /// Key of the root object, e.g. `camp`.
    pub fn root(&self) -> &'static str {
        self.root
    }

    /// Checks `payload`, returning its normalized form (numbers converted)
    /// or every violation found.
    pub fn validate(&self, payload: &Value) -> Result<Value, Violations> {
        let mut violations = Vec::new();

        let Some(top) = payload.as_object() else {
            return Err(Violations(vec![r#""value" must be of type object"#.to_owned()]));
        };
        for key in top.keys().filter(|k| k.as_str() != self.root) {
            violations.push(format!("\"{key}\" is not allowed"));
        }

        let normalized = match top.get(self.root) {
            None | Some(Value::Null) => {
                violations.push(format!("\"{}\" is required", self.root));
                None
            }
            Some(Value::Object(fields)) => Some(self.check_fields(fields, &mut violations)),
            Some(_) => {
                violations.push(format!("\"{}\" must be of type object", self.root));
                None
            }
        };

        match normalized {
            Some(fields) if violations.is_empty() => {
                let mut out = Map::new();
                out.insert(self.root.to_owned(), Value::Object(fields));
                Ok(Value::Object(out))
            }
            _ => Err(Violations(violations)),
        }
    }

    fn check_fields(&self, given: &Map<String, Value>, violations: &mut Vec<String>) -> Map<String, Value> {
        let mut out = Map::new();
        for field in self.fields {
            let path = format!("{}.{}", self.root, field.name);
            match check(field.rule, given.get(field.name)) {
                Ok(value) => {
                    out.insert(field.name.to_owned(), value);
                }
                Err(problem) => violations.push(format!("\"{path}\" {problem}")),
            }
        }
        for key in given.keys() {
            if !self.fields.iter().any(|f| f.name == key.as_str()) {
                violations.push(format!("\"{}.{key}\" is not allowed", self.root));
            }
        }
        out
    }
}

/// Why a single value failed its rule; rendered after the quoted field path.
enum Problem {
    Required,
    NotString,
    Empty,
    NotNumber,
    BelowMin(f64),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required    => f.write_str("is required"),
            Self::NotString   => f.write_str("must be a string"),
            Self::Empty       => f.write_str("is not allowed to be empty"),
            Self::NotNumber   => f.write_str("must be a number"),
            Self::BelowMin(m) => write!(f, "must be greater than or equal to {m}"),
        }
    }
}

fn check(rule: Rule, value: Option<&Value>) -> Result<Value, Problem> {
    let value = match value {
        None | Some(Value::Null) => return Err(Problem::Required),
        Some(v) => v,
    };
    match rule {
        Rule::Text => match value {
            Value::String(s) if s.is_empty() => Err(Problem::Empty),
            Value::String(s) => Ok(Value::String(s.clone())),
            _ => Err(Problem::NotString),
        },
        Rule::Number { min } => {
            let number = match value {
                Value::Number(n) => Some(n.clone()),
                Value::String(s) => parse_number(s.trim()),
                _ => None,
            }
            .ok_or(Problem::NotNumber)?;
            match number.as_f64() {
                Some(n) if n < min => Err(Problem::BelowMin(min)),
                Some(_) => Ok(Value::Number(number)),
                None => Err(Problem::NotNumber),
            }
        }
    }
}

/// `"25"` stays an integer, `"12.5"` becomes a float; `"inf"` and `"NaN"` are
/// not numbers.
fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Route guard: validates the request payload against [`CAMPGROUND`] and
/// continues with the normalized payload, or faults with `400` listing every
/// violation.
pub fn validate_campground(req: Request) -> Result<Request, Fault> {
    let empty = Value::Object(Map::new());
    let payload = req.payload().unwrap_or(&empty);
    match CAMPGROUND.validate(payload) {
        Ok(normalized) => Ok(req.with_payload(normalized)),
        Err(violations) => {
            tracing::debug!(violations = %violations, "payload rejected");
            Err(violations.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn valid() -> Value {
        json!({"camp": {"title": "Pine Ridge", "price": 25, "description": "quiet", "location": "CO"}})
    }

    #[test]
    fn valid_payload_passes() {
        assert_eq!(CAMPGROUND.validate(&valid()).unwrap(), valid());
    }

    #[test]
    fn numeric_string_price_is_converted() {
        let payload = json!({"camp": {"title": "t", "price": " 12.5 ", "description": "d", "location": "l"}});
        let normalized = CAMPGROUND.validate(&payload).unwrap();
        assert_eq!(normalized["camp"]["price"], json!(12.5));
    }

    #[test]
    fn every_violation_is_reported_in_one_pass() {
        let payload = json!({"camp": {"title": "", "price": -5}});
        let err = CAMPGROUND.validate(&payload).unwrap_err();
        assert_eq!(
            err.messages(),
            [
                r#""camp.title" is not allowed to be empty"#,
                r#""camp.price" must be greater than or equal to 0"#,
                r#""camp.description" is required"#,
                r#""camp.location" is required"#,
            ]
        );
        assert_eq!(err.message(), err.messages().join(","));
    }

    #[rstest]
    #[case(json!([]), r#""value" must be of type object"#)]
    #[case(json!({}), r#""camp" is required"#)]
    #[case(json!({"camp": null}), r#""camp" is required"#)]
    #[case(json!({"camp": "x"}), r#""camp" must be of type object"#)]
    fn malformed_root(#[case] payload: Value, #[case] expected: &str) {
        let err = CAMPGROUND.validate(&payload).unwrap_err();
        assert_eq!(err.messages(), [expected]);
    }

    #[rstest]
    #[case(json!("cheap"), r#""camp.price" must be a number"#)]
    #[case(json!(""), r#""camp.price" must be a number"#)]
    #[case(json!(true), r#""camp.price" must be a number"#)]
    #[case(json!("-1"), r#""camp.price" must be greater than or equal to 0"#)]
    fn bad_price(#[case] price: Value, #[case] expected: &str) {
        let mut payload = valid();
        payload["camp"]["price"] = price;
        let err = CAMPGROUND.validate(&payload).unwrap_err();
        assert_eq!(err.messages(), [expected]);
    }

    #[test]
    fn non_string_text_field_is_rejected() {
        let mut payload = valid();
        payload["camp"]["title"] = json!(7);
        let err = CAMPGROUND.validate(&payload).unwrap_err();
        assert_eq!(err.messages(), [r#""camp.title" must be a string"#]);
    }

    #[test]
    fn unknown_keys_are_rejected_at_both_levels() {
        let mut payload = valid();
        payload["camp"]["image"] = json!("x.png");
        payload["extra"] = json!(1);
        let err = CAMPGROUND.validate(&payload).unwrap_err();
        assert_eq!(
            err.messages(),
            [r#""extra" is not allowed"#, r#""camp.image" is not allowed"#]
        );
    }

    #[test]
    fn guard_turns_violations_into_bad_request() {
        use crate::method::Method;
        use crate::status::Status;

        let req = Request::new(Method::Post, "/").with_payload(json!({"camp": {}}));
        let fault = validate_campground(req).unwrap_err();
        assert_eq!(fault.status(), Status::BadRequest);
        assert!(fault.message().contains(r#""camp.title" is required"#));
        assert!(fault.message().contains(r#","camp.location" is required"#));
    }
}
