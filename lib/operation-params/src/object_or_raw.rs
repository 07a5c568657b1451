use std::collections::HashMap;

use serde::Serialize;
use sonic_rs::{JsonContainerTrait, JsonValueTrait, Value};
use tracing::trace;

pub type JsonObject = HashMap<String, Value>;

/// A request field that is expected to hold a JSON object, like `variables` or `extensions`.
///
/// Clients send those as an object, as a JSON-encoded string, or not at all.
/// Nothing is rejected at this stage, the executor decides what to do with `Raw` and `Other`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectOrRaw {
    /// Missing, `null` or an empty string.
    #[default]
    Absent,
    Object(JsonObject),
    /// A string that is not valid JSON, kept as it was received.
    Raw(String),
    /// Any other JSON value, for example an array or a number.
    Other(Value),
}

impl ObjectOrRaw {
    /// Normalizes the raw value of the `field` request parameter.
    /// Strings are decoded as JSON, and kept untouched when decoding fails.
    pub fn from_field(field: &str, value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return ObjectOrRaw::Absent;
        };

        match value.as_str() {
            Some(text) => Self::decode(field, text),
            None => Self::from_value(value),
        }
    }

    fn decode(field: &str, text: &str) -> Self {
        if text.is_empty() {
            return ObjectOrRaw::Absent;
        }

        match sonic_rs::from_str::<Value>(text) {
            Ok(decoded) => Self::from_value(&decoded),
            Err(err) => {
                trace!(
                    field,
                    error = %err,
                    "value of request parameter is not valid JSON, passing it through as a string"
                );
                ObjectOrRaw::Raw(text.to_string())
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        if value.is_null() {
            return ObjectOrRaw::Absent;
        }

        match value.as_object() {
            Some(obj) => ObjectOrRaw::Object(
                obj.iter()
                    .map(|(key, value)| (key.to_string(), value.clone()))
                    .collect(),
            ),
            None => ObjectOrRaw::Other(value.clone()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ObjectOrRaw::Absent)
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            ObjectOrRaw::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<JsonObject> {
        match self {
            ObjectOrRaw::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            ObjectOrRaw::Raw(text) => Some(text),
            _ => None,
        }
    }

    /// Looks up a top-level key, only when the field holds an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Name of the JSON type held by the field, handy for error messages
    /// such as "variables must be an object, got string".
    pub fn kind(&self) -> &'static str {
        match self {
            ObjectOrRaw::Absent => "null",
            ObjectOrRaw::Object(_) => "object",
            ObjectOrRaw::Raw(_) => "string",
            ObjectOrRaw::Other(value) => json_type_name(value),
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    if value.is_null() {
        "null"
    } else if value.is_boolean() {
        "boolean"
    } else if value.is_number() {
        "number"
    } else if value.is_str() {
        "string"
    } else if value.is_array() {
        "array"
    } else {
        "object"
    }
}

#[cfg(test)]
mod tests {
    use sonic_rs::{json, Value};

    use super::ObjectOrRaw;

    #[test]
    fn missing_and_null_are_absent() {
        assert_eq!(ObjectOrRaw::from_field("variables", None), ObjectOrRaw::Absent);
        assert_eq!(
            ObjectOrRaw::from_field("variables", Some(&Value::new_null())),
            ObjectOrRaw::Absent
        );
    }

    #[test]
    fn empty_string_is_absent() {
        let value = Value::from("");
        assert!(ObjectOrRaw::from_field("variables", Some(&value)).is_absent());
        assert!(ObjectOrRaw::from_field("extensions", Some(&value)).is_absent());
    }

    #[test]
    fn object_is_kept() {
        let value = json!({ "id": 1, "nested": { "flag": true } });
        let field = ObjectOrRaw::from_field("variables", Some(&value));

        assert_eq!(field.kind(), "object");
        assert_eq!(field.get("id"), Some(&json!(1)));
        assert_eq!(field.get("nested"), Some(&json!({ "flag": true })));
    }

    #[test]
    fn json_string_is_decoded() {
        let value = Value::from(r#"{"a":1,"b":["x","y"]}"#);
        let field = ObjectOrRaw::from_field("variables", Some(&value));

        let obj = field.as_object().expect("decoded object");
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("a"), Some(&json!(1)));
        assert_eq!(obj.get("b"), Some(&json!(["x", "y"])));
    }

    #[test]
    fn invalid_json_string_is_passed_through() {
        let value = Value::from("not json");
        let field = ObjectOrRaw::from_field("variables", Some(&value));

        assert_eq!(field, ObjectOrRaw::Raw("not json".to_string()));
        assert_eq!(field.as_raw(), Some("not json"));
        assert_eq!(field.kind(), "string");
        assert!(field.as_object().is_none());
    }

    #[test]
    fn json_null_string_is_absent() {
        let value = Value::from("null");
        assert!(ObjectOrRaw::from_field("extensions", Some(&value)).is_absent());
    }

    #[test]
    fn non_object_values_are_passed_through() {
        let array = json!([1, 2]);
        let field = ObjectOrRaw::from_field("variables", Some(&array));
        assert_eq!(field, ObjectOrRaw::Other(json!([1, 2])));
        assert_eq!(field.kind(), "array");

        let encoded_number = Value::from("42");
        let field = ObjectOrRaw::from_field("variables", Some(&encoded_number));
        assert_eq!(field, ObjectOrRaw::Other(json!(42)));
        assert_eq!(field.kind(), "number");

        let encoded_string = Value::from(r#""quoted""#);
        let field = ObjectOrRaw::from_field("variables", Some(&encoded_string));
        assert_eq!(field, ObjectOrRaw::Other(json!("quoted")));
        assert_eq!(field.kind(), "string");
        assert!(field.as_raw().is_none());
    }

    #[test]
    fn serializes_like_the_held_value() {
        let decoded = ObjectOrRaw::from_field("variables", Some(&Value::from(r#"{"a":1}"#)));

        assert_eq!(sonic_rs::to_string(&ObjectOrRaw::Absent).unwrap(), "null");
        assert_eq!(sonic_rs::to_string(&decoded).unwrap(), r#"{"a":1}"#);
        assert_eq!(
            sonic_rs::to_string(&ObjectOrRaw::Raw("oops".into())).unwrap(),
            r#""oops""#
        );
        assert_eq!(
            sonic_rs::to_string(&ObjectOrRaw::Other(json!([true]))).unwrap(),
            "[true]"
        );
    }
}
