use serde::{Serialize, Serializer};

use crate::adapter::DocumentReference;
use crate::snapshot::{ID, REF, TYPE};
use crate::value::{Document, Value};

/// A lightweight pointer to a model: `{type, id, ref}` plus any attributes
/// copied from the model's snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRef {
    type_name: String,
    id: String,
    reference: DocumentReference,
    attributes: Document,
}

impl ModelRef {
    pub fn new(
        type_name: impl Into<String>,
        id: impl Into<String>,
        reference: DocumentReference,
        attributes: Document,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
            reference,
            attributes,
        }
    }

    /// Reads a model reference out of stored data.
    ///
    /// Requires a string `type`, a string `id` and a reference-like `ref`.
    /// Every other key is kept as a copied attribute.
    pub fn from_value(value: &Value) -> Option<ModelRef> {
        let map = value.as_map()?;
        let type_name = map.get(TYPE)?.as_str()?;
        let id = map.get(ID)?.as_str()?;
        let reference = map.get(REF)?.as_reference()?;
        let attributes = map
            .iter()
            .filter(|(key, _)| ![TYPE, ID, REF].contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Some(ModelRef::new(type_name, id, reference, attributes))
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

    pub fn attributes(&self) -> &Document {
        &self.attributes
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    pub fn to_document(&self) -> Document {
        let mut document = self.attributes.clone();
        document.insert(TYPE.into(), Value::String(self.type_name.clone()));
        document.insert(ID.into(), Value::String(self.id.clone()));
        document.insert(REF.into(), Value::Reference(self.reference.clone()));
        document
    }
}

impl From<ModelRef> for Value {
    fn from(model_ref: ModelRef) -> Self {
        Value::Map(model_ref.to_document())
    }
}

impl Serialize for ModelRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.to_document())
    }
}
