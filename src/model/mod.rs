//! Models - typed views over immutable document snapshots.
//!
//! A [`ModelDescriptor`] (built with [`ModelOptions`]) says how documents of
//! one kind come into existence: type, collection, id prefix, parent,
//! initializer, derived fields and validators. A [`Model`] is one instance:
//! a snapshot plus the updates accumulated since it was loaded.
//!
//! ## Example
//!
//! ```ignore
//! use snapdm::{doc, Adapter, ModelOptions, Value};
//!
//! let foos = ModelOptions::new("Foo", "foos")
//!     .prefix("foo")
//!     .derive(|data| {
//!         let size = data.get("value").and_then(Value::as_str).map_or(0, str::len);
//!         Ok(doc! { "size" => size })
//!     })
//!     .build();
//!
//! let adapter = Adapter::standard();
//! let foo = foos.create(&adapter, &doc! { "value" => "ab" })?;
//! assert!(foo.is_new());
//!
//! let foo = foo.clone_with(&adapter, doc! { "value" => "abc" })?;
//! assert_eq!(foo.get("size"), Some(&Value::from(3)));
//! ```

mod descriptor;
mod factory;
mod reference;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::adapter::{Adapter, DocumentReference};
use crate::error::{Error, Result};
use crate::snapshot::{Snapshot, CREATED_AT, ID, REF, TYPE, UPDATED_AT};
use crate::validator::ValidationErrors;
use crate::value::{from_document, merge, to_document, Document, Value};

pub use descriptor::{BaseInitializer, ModelDescriptor, ModelOptions, ParentSpec};
pub use factory::{build_model, ModelFactory};
pub use reference::ModelRef;

/// Identity attributes a clone patch may not touch. `updatedAt` is allowed
/// and always overwritten.
const PROTECTED_FIELDS: [&str; 4] = [TYPE, ID, REF, CREATED_AT];

/// Rehydration options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructOptions {
    pub is_new: bool,
    pub updates: Option<Document>,
}

/// One model instance.
///
/// Never mutated: [`Model::clone_with`] returns a new instance and leaves
/// this one as it was.
#[derive(Clone)]
pub struct Model {
    descriptor: Arc<ModelDescriptor>,
    snapshot: Arc<Snapshot>,
    updates: Option<Arc<Document>>,
    is_new: bool,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("snapshot", &self.snapshot)
            .field("updates", &self.updates)
            .field("is_new", &self.is_new)
            .finish()
    }
}

impl Model {
    pub(crate) fn from_parts(
        descriptor: Arc<ModelDescriptor>,
        snapshot: Arc<Snapshot>,
        updates: Option<Arc<Document>>,
        is_new: bool,
    ) -> Self {
        Self {
            descriptor,
            snapshot,
            updates,
            is_new,
        }
    }

    pub fn descriptor(&self) -> &Arc<ModelDescriptor> {
        &self.descriptor
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Everything that differs from the snapshot this model was copied
    /// from, including a fresh `updatedAt`. `None` until a non-empty clone.
    pub fn updates(&self) -> Option<&Document> {
        self.updates.as_deref()
    }

    /// True when built from an initializer rather than a stored snapshot.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// True when there is something to write.
    pub fn is_dirty(&self) -> bool {
        self.is_new || self.updates.is_some()
    }

    pub fn type_name(&self) -> &str {
        self.snapshot.type_name()
    }

    pub fn id(&self) -> &str {
        self.snapshot.id()
    }

    pub fn reference(&self) -> &DocumentReference {
        self.snapshot.reference()
    }

    pub fn created_at(&self) -> &Value {
        self.snapshot.created_at()
    }

    pub fn updated_at(&self) -> &Value {
        self.snapshot.updated_at()
    }

    /// A domain field of the snapshot.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.snapshot.get(field)
    }

    /// A domain field deserialized into `T`. A missing field reads as null,
    /// so `Option<T>` accepts it.
    pub fn get_as<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        let json = self.get(field).map_or(serde_json::Value::Null, Value::to_json);
        Ok(serde_json::from_value(json)?)
    }

    /// All domain data deserialized into `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        from_document(self.snapshot.data())
    }

    /// Runs the descriptor's validator over the snapshot.
    pub fn validate(&self) -> Option<ValidationErrors> {
        self.descriptor.validate(&self.snapshot)
    }

    /// `{type, id, ref}` plus each named attribute present in the snapshot.
    pub fn to_ref(&self, attributes: &[&str]) -> ModelRef {
        let attributes = attributes
            .iter()
            .filter_map(|name| {
                self.get(name)
                    .map(|value| ((*name).to_string(), value.clone()))
            })
            .collect();
        ModelRef::new(
            self.type_name(),
            self.id(),
            self.reference().clone(),
            attributes,
        )
    }

    /// A copy of this model with pending updates dropped.
    ///
    /// `is_new` carries over; `updates` does not.
    pub fn duplicate(&self) -> Model {
        self.descriptor.rehydrate(
            Arc::new(Snapshot::clone(&self.snapshot)),
            ConstructOptions {
                is_new: self.is_new,
                updates: None,
            },
        )
    }

    /// Returns a new model with `patch` applied.
    ///
    /// The patch is a deep partial of the domain data. It is merged into the
    /// pending updates together with a fresh `updatedAt`, and the new
    /// snapshot is the current one with those updates applied. Arrays in the
    /// patch replace stored arrays. Derived fields are recomputed. The new
    /// model keeps this model's `is_new`.
    ///
    /// An empty patch is [`Model::duplicate`].
    pub fn clone_with(&self, adapter: &Adapter, patch: Document) -> Result<Model> {
        if patch.is_empty() {
            return Ok(self.duplicate());
        }
        if let Some(field) = patch
            .keys()
            .find(|field| PROTECTED_FIELDS.contains(&field.as_str()))
        {
            return Err(Error::IdentityPatch {
                field: field.clone(),
            });
        }

        let stamp = crate::doc! { UPDATED_AT => adapter.server_timestamp() };
        let pending = self.updates.as_deref().cloned().unwrap_or_default();
        let mut computed = merge([&pending, &patch, &stamp]);
        let mut next = self.snapshot.apply(&computed);

        let derived: Document = self
            .descriptor
            .derived_fields(next.data())?
            .into_iter()
            .filter(|(field, value)| {
                !PROTECTED_FIELDS.contains(&field.as_str())
                    && field != UPDATED_AT
                    && self.get(field) != Some(value)
            })
            .collect();
        if !derived.is_empty() {
            computed = merge([&computed, &derived]);
            next = self.snapshot.apply(&computed);
        }

        debug!(
            model = next.type_name(),
            id = next.id(),
            fields = computed.len(),
            "cloned model with updates"
        );
        Ok(self.descriptor.rehydrate(
            Arc::new(next),
            ConstructOptions {
                is_new: self.is_new,
                updates: Some(computed),
            },
        ))
    }

    /// [`Model::clone_with`] for a typed patch.
    pub fn update<P: serde::Serialize + ?Sized>(&self, adapter: &Adapter, patch: &P) -> Result<Model> {
        self.clone_with(adapter, to_document(patch)?)
    }
}

impl From<&Model> for ModelRef {
    fn from(model: &Model) -> Self {
        model.to_ref(&[])
    }
}

impl From<&Model> for Value {
    fn from(model: &Model) -> Self {
        ModelRef::from(model).into()
    }
}
