//! The adapter: everything the environment supplies.
//!
//! Model construction never reaches for ids, clocks or references on its
//! own. It asks the [`Adapter`] it is handed, which bundles four pluggable
//! capabilities:
//!
//! - [`IdFactory`]: fresh document ids
//! - [`FieldValueFactory`]: write-time sentinels (server timestamp, array
//!   union/remove, increment, delete)
//! - [`TimestampFactory`]: concrete timestamps
//! - [`ReferenceFactory`]: document references from collection, id and an
//!   optional parent
//!
//! [`Adapter::standard`] wires UUID ids, sentinel field values, the system
//! clock and path references. Hosts that want a single process-wide adapter
//! can register one with [`initialize`] and read it back with [`adapter`].

mod field_values;
mod ids;
mod references;
mod registry;
mod timestamps;

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

pub use field_values::{FieldValue, FieldValueFactory, SentinelFieldValues};
pub use ids::{IdFactory, UuidIds};
pub use references::{CollectionReference, DocumentReference, PathReferences, ReferenceFactory};
pub use registry::{adapter, initialize, SnapdmOptions};
pub use timestamps::{SystemTimestamps, Timestamp, TimestampFactory};

/// The capability set models are built with.
#[derive(Clone)]
pub struct Adapter {
    ids: Arc<dyn IdFactory>,
    field_values: Arc<dyn FieldValueFactory>,
    timestamps: Arc<dyn TimestampFactory>,
    references: Arc<dyn ReferenceFactory>,
}

impl Default for Adapter {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter").finish_non_exhaustive()
    }
}

impl Adapter {
    /// UUID ids, sentinel field values, system clock, path references.
    pub fn standard() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> AdapterBuilder {
        AdapterBuilder::default()
    }

    pub fn ids(&self) -> &dyn IdFactory {
        self.ids.as_ref()
    }

    pub fn field_values(&self) -> &dyn FieldValueFactory {
        self.field_values.as_ref()
    }

    pub fn timestamps(&self) -> &dyn TimestampFactory {
        self.timestamps.as_ref()
    }

    pub fn references(&self) -> &dyn ReferenceFactory {
        self.references.as_ref()
    }

    pub fn generate_id(&self) -> String {
        self.ids.generate()
    }

    pub fn server_timestamp(&self) -> Value {
        self.field_values.server_timestamp()
    }

    pub fn reference(
        &self,
        collection: &str,
        id: &str,
        parent: Option<&DocumentReference>,
    ) -> DocumentReference {
        self.references.reference(collection, id, parent)
    }
}

/// Builds an [`Adapter`], defaulting every capability left unset.
#[derive(Default)]
pub struct AdapterBuilder {
    ids: Option<Arc<dyn IdFactory>>,
    field_values: Option<Arc<dyn FieldValueFactory>>,
    timestamps: Option<Arc<dyn TimestampFactory>>,
    references: Option<Arc<dyn ReferenceFactory>>,
}

impl AdapterBuilder {
    pub fn ids(mut self, ids: impl IdFactory + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    pub fn field_values(mut self, field_values: impl FieldValueFactory + 'static) -> Self {
        self.field_values = Some(Arc::new(field_values));
        self
    }

    pub fn timestamps(mut self, timestamps: impl TimestampFactory + 'static) -> Self {
        self.timestamps = Some(Arc::new(timestamps));
        self
    }

    pub fn references(mut self, references: impl ReferenceFactory + 'static) -> Self {
        self.references = Some(Arc::new(references));
        self
    }

    pub fn build(self) -> Adapter {
        Adapter {
            ids: self.ids.unwrap_or_else(|| Arc::new(UuidIds)),
            field_values: self
                .field_values
                .unwrap_or_else(|| Arc::new(SentinelFieldValues)),
            timestamps: self.timestamps.unwrap_or_else(|| Arc::new(SystemTimestamps)),
            references: self.references.unwrap_or_else(|| Arc::new(PathReferences)),
        }
    }
}
