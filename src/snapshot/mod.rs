//! Snapshots - the immutable canonical form of a stored document.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::adapter::DocumentReference;
use crate::error::{Error, Result};
use crate::value::{merge, Document, Value};

pub const TYPE: &str = "type";
pub const ID: &str = "id";
pub const REF: &str = "ref";
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

/// Identity attributes, in document field names.
pub const IDENTITY_FIELDS: [&str; 5] = [TYPE, ID, REF, CREATED_AT, UPDATED_AT];

/// A document snapshot: identity attributes plus domain data.
///
/// The identity never changes for the lifetime of a snapshot value; every
/// change produces a new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    type_name: String,
    id: String,
    reference: DocumentReference,
    created_at: Value,
    updated_at: Value,
    data: Document,
}

impl Snapshot {
    /// Assembles a snapshot. Identity keys inside `data` are dropped.
    pub fn new(
        type_name: impl Into<String>,
        id: impl Into<String>,
        reference: DocumentReference,
        created_at: Value,
        updated_at: Value,
        mut data: Document,
    ) -> Self {
        for field in IDENTITY_FIELDS {
            data.remove(field);
        }
        Self {
            type_name: type_name.into(),
            id: id.into(),
            reference,
            created_at,
            updated_at,
            data,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn reference(&self) -> &DocumentReference {
        &self.reference
    }

    pub fn created_at(&self) -> &Value {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Value {
        &self.updated_at
    }

    /// Domain data, without identity attributes.
    pub fn data(&self) -> &Document {
        &self.data
    }

    /// A domain field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// The full document: identity attributes and domain data.
    pub fn to_document(&self) -> Document {
        let mut document = self.data.clone();
        document.insert(TYPE.into(), Value::String(self.type_name.clone()));
        document.insert(ID.into(), Value::String(self.id.clone()));
        document.insert(REF.into(), Value::Reference(self.reference.clone()));
        document.insert(CREATED_AT.into(), self.created_at.clone());
        document.insert(UPDATED_AT.into(), self.updated_at.clone());
        document
    }

    /// Applies a deep-partial update.
    ///
    /// `updatedAt` in `updates` replaces the current one; the other identity
    /// attributes are ignored.
    pub(crate) fn apply(&self, updates: &Document) -> Snapshot {
        let mut data_updates = updates.clone();
        let updated_at = data_updates
            .remove(UPDATED_AT)
            .unwrap_or_else(|| self.updated_at.clone());
        Snapshot::new(
            self.type_name.clone(),
            self.id.clone(),
            self.reference.clone(),
            self.created_at.clone(),
            updated_at,
            merge([&self.data, &data_updates]),
        )
    }
}

/// Recognizes an existing snapshot, as opposed to a raw initializer.
///
/// True iff `value` is a map with a string `type`, a string `id`, and
/// `ref`, `createdAt` and `updatedAt` keys. A present key counts even when it
/// holds null: a pending server timestamp reads back as null. A map with
/// only `type` and `id` is an initializer.
pub fn is_snapshot(value: &Value) -> bool {
    value.as_map().is_some_and(is_snapshot_document)
}

/// [`is_snapshot`] over a document.
pub fn is_snapshot_document(document: &Document) -> bool {
    document.get(TYPE).and_then(Value::as_str).is_some()
        && document.get(ID).and_then(Value::as_str).is_some()
        && [REF, CREATED_AT, UPDATED_AT]
            .iter()
            .all(|field| document.contains_key(*field))
}

impl TryFrom<Document> for Snapshot {
    type Error = Error;

    /// Splits a stored snapshot into identity and data.
    ///
    /// Fails with [`Error::NotASnapshot`] when the document is not one, and
    /// with [`Error::InvalidReference`] when its `ref` cannot be read as a
    /// document reference.
    fn try_from(mut document: Document) -> Result<Self> {
        if !is_snapshot_document(&document) {
            return Err(Error::NotASnapshot);
        }
        let reference = match document.get(REF) {
            Some(value) => value.as_reference().ok_or_else(|| Error::InvalidReference {
                found: value.to_string(),
            })?,
            None => return Err(Error::NotASnapshot),
        };
        let mut take_string = |field: &str| match document.remove(field) {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };
        let type_name = take_string(TYPE);
        let id = take_string(ID);
        let created_at = document.remove(CREATED_AT).unwrap_or_default();
        let updated_at = document.remove(UPDATED_AT).unwrap_or_default();
        Ok(Snapshot::new(
            type_name, id, reference, created_at, updated_at, document,
        ))
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(&self.to_document())
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let document = Document::deserialize(deserializer)?;
        Snapshot::try_from(document).map_err(de::Error::custom)
    }
}
