//! Frame descriptor data model
//!
//! A frame descriptor is an ordered mapping from field name to value,
//! stored as an insertion-ordered `serde_json` object. Ordering is
//! preserved through encode and decode so the bytes on the wire match the
//! order the catalog author wrote.

use serde::{Deserialize, Serialize};
use serde_json::Map;

pub use serde_json::Value as JsonValue;

/// A single field value as written by a catalog author
///
/// No float or null variant; a descriptor only holds what this type can
/// express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// UTF-8 text, passed through verbatim
    Text(String),
    /// Signed integer
    Integer(i64),
    /// Boolean flag
    Bool(bool),
    /// Ordered list of values
    List(Vec<Value>),
    /// Nested descriptor
    Object(FrameDescriptor),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<FrameDescriptor> for Value {
    fn from(frame: FrameDescriptor) -> Self {
        Value::Object(frame)
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(s) => JsonValue::String(s),
            Value::Integer(n) => JsonValue::Number(n.into()),
            Value::Bool(b) => JsonValue::Bool(b),
            Value::List(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            Value::Object(frame) => JsonValue::Object(frame.fields),
        }
    }
}

/// A decoded field held a value no [`Value`] can express
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}` holds an unsupported {kind} value")]
pub struct UnsupportedValue {
    pub field: String,
    pub kind: &'static str,
}

/// Ordered field-name to value mapping describing one display update
///
/// The sender does not validate field names. Inserting a field that
/// already exists replaces its value and keeps its original position.
/// Equality compares fields by name, not by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Map<String, JsonValue>",
    into = "Map<String, JsonValue>"
)]
pub struct FrameDescriptor {
    fields: Map<String, JsonValue>,
}

impl FrameDescriptor {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field
    ///
    /// Returns the previous value if the field was already present.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<JsonValue> {
        self.fields.insert(field.into(), JsonValue::from(value.into()))
    }

    /// Look up a field by name
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FrameDescriptor {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut frame = FrameDescriptor::new();
        for (field, value) in iter {
            frame.insert(field, value);
        }
        frame
    }
}

impl TryFrom<Map<String, JsonValue>> for FrameDescriptor {
    type Error = UnsupportedValue;

    fn try_from(fields: Map<String, JsonValue>) -> Result<Self, UnsupportedValue> {
        for (field, value) in &fields {
            check_value(field, value)?;
        }
        Ok(Self { fields })
    }
}

impl From<FrameDescriptor> for Map<String, JsonValue> {
    fn from(frame: FrameDescriptor) -> Self {
        frame.fields
    }
}

/// Reject anything outside text, integers, booleans, arrays and objects
fn check_value(field: &str, value: &JsonValue) -> Result<(), UnsupportedValue> {
    let unsupported = |kind| {
        Err(UnsupportedValue {
            field: field.to_owned(),
            kind,
        })
    };

    match value {
        JsonValue::Null => unsupported("null"),
        JsonValue::Number(n) if !n.is_i64() => unsupported("non-integer number"),
        JsonValue::Array(items) => items.iter().try_for_each(|item| check_value(field, item)),
        JsonValue::Object(nested) => nested
            .iter()
            .try_for_each(|(name, item)| check_value(name, item)),
        _ => Ok(()),
    }
}
