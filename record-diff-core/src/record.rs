use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use serde_json::{Number, Value};
use thiserror::Error;

/// Name of the mandatory key field carried by every record.
pub const NAME_FIELD: &str = "name";

/// Errors raised while turning raw JSON into records.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    /// The record payload was not a JSON object.
    #[error("record is not a JSON object")]
    NotAnObject,
    /// The record has no `name` field.
    #[error("record has no `name` field")]
    MissingName,
    /// The `name` field is present but not a string.
    #[error("record `name` must be a string")]
    NameNotString,
    /// The collection payload was not a JSON array.
    #[error("collection payload is not a JSON array")]
    NotAnArray,
    /// One element of a collection failed to convert.
    #[error("invalid record at index {index}: {source}")]
    InvalidRecord {
        index: usize,
        source: Box<RecordError>,
    },
}

/// A primitive field value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Scalar {
    /// Text form used when the scalar takes part in a set comparison.
    pub fn to_token(&self) -> String {
        match self {
            Scalar::Text(text) => text.clone(),
            Scalar::Number(number) => number.to_string(),
            Scalar::Bool(flag) => flag.to_string(),
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Number(a), Scalar::Number(b)) => numbers_equal(a, b),
            _ => false,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => write!(f, "{text}"),
            Scalar::Number(number) => write!(f, "{number}"),
            Scalar::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

// `1` and `1.0` are the same value once a payload has been through a JSON
// encoder on the device side.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        };
    }
    a == b
}

/// A field value as delivered by the device API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON `null`.
    Null,
    Scalar(Scalar),
    /// Normalized members of a set-valued field.
    List(Vec<Scalar>),
    /// Ordered array in a field compared structurally.
    Sequence(Vec<FieldValue>),
    /// Nested sub-fields.
    Structured(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Shorthand for a text scalar.
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Scalar(Scalar::Text(value.into()))
    }

    /// Return the text content if this is a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(Scalar::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Look up a sub-field of a structured value.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Structured(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(flag) => FieldValue::Scalar(Scalar::Bool(flag)),
            Value::Number(number) => FieldValue::Scalar(Scalar::Number(number)),
            Value::String(text) => FieldValue::Scalar(Scalar::Text(text)),
            Value::Array(items) => {
                FieldValue::Sequence(items.into_iter().map(FieldValue::from).collect())
            }
            Value::Object(map) => FieldValue::Structured(
                map.into_iter()
                    .map(|(key, value)| (key, FieldValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::text(value)
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "None"),
            FieldValue::Scalar(scalar) => write!(f, "{scalar}"),
            FieldValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(", "))
            }
            FieldValue::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(", "))
            }
            FieldValue::Structured(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// A named configuration object (tag, address, policy, ...).
///
/// `name` is the comparison key. Matching is case-insensitive through
/// [`Record::key`]; the stored name keeps the device's casing for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    /// Every field except `name`.
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create a record with no fields besides its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let key = key.into();
        if key != NAME_FIELD {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// Case-folded matching key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Return a field value if present.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Text content of a field, if it is a text scalar.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }
}

impl TryFrom<Value> for Record {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut map) = value else {
            return Err(RecordError::NotAnObject);
        };
        let name = match map.remove(NAME_FIELD) {
            Some(Value::String(name)) => name,
            Some(_) => return Err(RecordError::NameNotString),
            None => return Err(RecordError::MissingName),
        };
        let fields = map
            .into_iter()
            .map(|(key, value)| (key, FieldValue::from(value)))
            .collect();
        Ok(Self { name, fields })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FieldValue, Record, RecordError, Scalar};

    #[test]
    fn converts_json_object_and_keeps_name_casing() {
        let record = Record::try_from(json!({
            "name": "Web-Servers",
            "members": {"member": ["a", "b"]},
            "description": null
        }))
        .expect("record");

        assert_eq!(record.name, "Web-Servers");
        assert_eq!(record.key(), "web-servers");
        assert!(!record.fields.contains_key("name"));
        assert_eq!(record.get("description"), Some(&FieldValue::Null));
        assert!(matches!(
            record.get("members"),
            Some(FieldValue::Structured(_))
        ));
    }

    #[test]
    fn rejects_missing_or_non_string_name() {
        assert_eq!(
            Record::try_from(json!({"colour": "red"})),
            Err(RecordError::MissingName)
        );
        assert_eq!(
            Record::try_from(json!({"name": 4})),
            Err(RecordError::NameNotString)
        );
        assert_eq!(
            Record::try_from(json!(["name"])),
            Err(RecordError::NotAnObject)
        );
    }

    #[test]
    fn integer_and_float_numbers_compare_equal() {
        let a = Scalar::Number(serde_json::Number::from(443));
        let b = Scalar::Number(serde_json::Number::from_f64(443.0).expect("finite"));
        assert_eq!(a, b);
        assert_ne!(a, Scalar::Text("443".to_string()));
    }

    #[test]
    fn serializes_back_to_flat_object() {
        let record = Record::new("Tag1").with_field("colour", "red");
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value, json!({"name": "Tag1", "colour": "red"}));
    }
}
