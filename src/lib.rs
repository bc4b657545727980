//! Object-document mapping over immutable snapshots.
//!
//! Models are described once with [`ModelOptions`] and instantiated either
//! from an initializer (a new document gets its type, id, reference and
//! timestamps from the [`Adapter`]) or from a stored snapshot. Changes never
//! mutate: [`Model::clone_with`] returns a new model carrying the accumulated
//! `updates` a persistence layer needs to write.

extern crate self as snapdm;

mod adapter;
mod error;
mod model;
mod snapshot;
mod validator;
mod value;

pub use adapter::{
    adapter, initialize, Adapter, AdapterBuilder, CollectionReference, DocumentReference,
    FieldValue, FieldValueFactory, IdFactory, PathReferences, ReferenceFactory,
    SentinelFieldValues, SnapdmOptions, SystemTimestamps, Timestamp, TimestampFactory, UuidIds,
};
pub use error::{Error, Result};
pub use model::{
    build_model, BaseInitializer, ConstructOptions, Model, ModelDescriptor, ModelFactory,
    ModelOptions, ModelRef, ParentSpec,
};
pub use snapshot::{
    is_snapshot, is_snapshot_document, Snapshot, CREATED_AT, ID, IDENTITY_FIELDS, REF, TYPE,
    UPDATED_AT,
};
pub use validator::{always_valid, combine, validator, violation, ValidationErrors, Validator};
pub use value::{from_document, merge, to_document, Document, Value};

#[cfg(feature = "derive")]
pub use snapdm_macros::ModelFields;
