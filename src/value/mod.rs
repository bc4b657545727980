//! Document values.
//!
//! A [`Document`] is an ordered map of field names to [`Value`]s. Besides the
//! JSON value kinds, a `Value` can hold the three opaque kinds an adapter
//! produces: timestamps, document references, and field-value sentinels.
//! Those are leaves: the core stores and copies them but never looks inside.

mod merge;

use std::collections::BTreeMap;
use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};

use crate::adapter::{DocumentReference, FieldValue, Timestamp};
use crate::error::{Error, Result};

pub use merge::merge;

/// A document: field name to value, ordered by field name.
pub type Document = BTreeMap<String, Value>;

/// A single document value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    Map(Document),
    Timestamp(Timestamp),
    Reference(DocumentReference),
    FieldValue(FieldValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Document> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_field_value(&self) -> Option<&FieldValue> {
        match self {
            Value::FieldValue(fv) => Some(fv),
            _ => None,
        }
    }

    /// Interprets this value as a document reference.
    ///
    /// Accepts a [`Value::Reference`], a slash-separated document path, or a
    /// map carrying a string `path` (the serialized form of a reference).
    pub fn as_reference(&self) -> Option<DocumentReference> {
        match self {
            Value::Reference(reference) => Some(reference.clone()),
            Value::String(path) => DocumentReference::from_path(path),
            Value::Map(map) => map
                .get("path")
                .and_then(Value::as_str)
                .and_then(DocumentReference::from_path),
            _ => None,
        }
    }

    /// Looks up a field when this value is a map.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(field))
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Timestamp(_) => "timestamp",
            Value::Reference(_) => "reference",
            Value::FieldValue(_) => "field value",
        }
    }

    /// Converts into plain JSON. Opaque kinds use their serialized form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(document_to_json(map)),
            Value::Timestamp(ts) => ts.to_json(),
            Value::Reference(reference) => reference.to_json(),
            Value::FieldValue(fv) => fv.to_json(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map),
            Value::Timestamp(ts) => ts.serialize(serializer),
            Value::Reference(reference) => reference.serialize(serializer),
            Value::FieldValue(fv) => fv.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from_stored)
    }
}

impl Value {
    /// Reads a value back from its serialized JSON form.
    ///
    /// Unlike `From<serde_json::Value>`, maps shaped like a serialized
    /// adapter value come back typed: `{seconds, nanoseconds}` as a
    /// [`Timestamp`], `{id, path}` as a [`DocumentReference`] when the path
    /// ends in that id, and any map tagged `fieldValue` as a [`FieldValue`].
    pub fn from_stored(json: serde_json::Value) -> Value {
        match json {
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_stored).collect())
            }
            serde_json::Value::Object(map) => stored_leaf(&map).unwrap_or_else(|| {
                Value::Map(
                    map.into_iter()
                        .map(|(key, value)| (key, Value::from_stored(value)))
                        .collect(),
                )
            }),
            other => Value::from(other),
        }
    }
}

fn stored_leaf(map: &serde_json::Map<String, serde_json::Value>) -> Option<Value> {
    let shaped = |keys: &[&str]| map.len() == keys.len() && keys.iter().all(|key| map.contains_key(*key));
    let json = || serde_json::Value::Object(map.clone());

    if map.contains_key("fieldValue") {
        serde_json::from_value::<FieldValue>(json())
            .ok()
            .map(Value::FieldValue)
    } else if shaped(&["seconds", "nanoseconds"]) {
        serde_json::from_value::<Timestamp>(json())
            .ok()
            .map(Value::Timestamp)
    } else if shaped(&["id", "path"]) {
        let id = map.get("id")?.as_str()?;
        let path = map.get("path")?.as_str()?;
        DocumentReference::from_path(path)
            .filter(|reference| reference.id() == id)
            .map(Value::Reference)
    } else {
        None
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(document_from_json(map)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(serde_json::Number::from(value))
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Document> for Value {
    fn from(map: Document) -> Self {
        Value::Map(map)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<DocumentReference> for Value {
    fn from(reference: DocumentReference) -> Self {
        Value::Reference(reference)
    }
}

impl From<FieldValue> for Value {
    fn from(fv: FieldValue) -> Self {
        Value::FieldValue(fv)
    }
}

pub(crate) fn document_to_json(document: &Document) -> serde_json::Map<String, serde_json::Value> {
    document
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}

fn document_from_json(map: serde_json::Map<String, serde_json::Value>) -> Document {
    map.into_iter()
        .map(|(key, value)| (key, Value::from(value)))
        .collect()
}

/// Serializes a typed value into a document.
///
/// Timestamps, references and field values inside `value` stay typed (see
/// [`Value::from_stored`]).
///
/// Fails with [`Error::NotADocument`] when the value does not serialize to a
/// map (a string, a sequence, a unit struct...).
pub fn to_document<T: Serialize + ?Sized>(value: &T) -> Result<Document> {
    match Value::from_stored(serde_json::to_value(value)?) {
        Value::Map(document) => Ok(document),
        other => Err(Error::NotADocument {
            found: other.kind(),
        }),
    }
}

/// Deserializes a typed value out of a document.
pub fn from_document<T: DeserializeOwned>(document: &Document) -> Result<T> {
    let json = serde_json::Value::Object(document_to_json(document));
    Ok(serde_json::from_value(json)?)
}

/// Builds a [`Document`] from `key => value` pairs.
///
/// ```ignore
/// let init = doc! { "value" => "ab", "tags" => vec!["a", "b"] };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut document = $crate::Document::new();
        $(
            document.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        document
    }};
}
