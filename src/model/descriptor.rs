//! Model descriptors and the builder that produces them.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{ConstructOptions, Model, ModelRef};
use crate::adapter::{Adapter, DocumentReference};
use crate::error::{Error, Result};
use crate::snapshot::{is_snapshot_document, Snapshot, CREATED_AT, ID, REF, TYPE, UPDATED_AT};
use crate::validator::{always_valid, combine, Validator, ValidationErrors};
use crate::value::{from_document, merge, to_document, Document, Value};

type InitializeFn = Arc<dyn Fn(Document) -> Result<Document> + Send + Sync>;
type ExtendingInitializeFn =
    Arc<dyn Fn(Document, &BaseInitializer<'_>) -> Result<Document> + Send + Sync>;
type DeriveFn = Arc<dyn Fn(&Document) -> Result<Document> + Send + Sync>;

enum Initializer {
    /// The base model's initializer, or the identity without a base.
    Inherited,
    Plain(InitializeFn),
    Extending(ExtendingInitializeFn),
}

/// Names the initializer attribute holding a reference to the parent model.
#[derive(Clone)]
pub struct ParentSpec {
    model: Arc<ModelDescriptor>,
    attribute: String,
}

impl ParentSpec {
    pub fn model(&self) -> &Arc<ModelDescriptor> {
        &self.model
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl fmt::Debug for ParentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentSpec")
            .field("model", &self.model.type_name())
            .field("attribute", &self.attribute)
            .finish()
    }
}

/// Gives an extending initializer access to its base model's initializer.
pub struct BaseInitializer<'a> {
    base: Option<&'a ModelDescriptor>,
}

impl BaseInitializer<'_> {
    /// Runs the base model's initializer (itself possibly extending another).
    pub fn initialize(&self, init: Document) -> Result<Document> {
        match self.base {
            Some(base) => base.initialize(init),
            None => Ok(init),
        }
    }

    pub fn descriptor(&self) -> Option<&ModelDescriptor> {
        self.base
    }
}

/// The metadata and behavior of one model.
///
/// Built with [`ModelOptions`] and shared behind an `Arc`. A descriptor that
/// extends another holds its base, so an extension chain is a linear list
/// ending in a descriptor without one.
pub struct ModelDescriptor {
    type_name: Option<String>,
    collection: String,
    prefix: Option<String>,
    parent: Option<ParentSpec>,
    initializer: Initializer,
    derive: Option<DeriveFn>,
    validator: Validator<Snapshot>,
    base: Option<Arc<ModelDescriptor>>,
}

impl fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("type_name", &self.type_name)
            .field("collection", &self.collection)
            .field("prefix", &self.prefix)
            .field("parent", &self.parent)
            .field("base", &self.base.as_ref().map(|base| base.type_name()))
            .finish_non_exhaustive()
    }
}

impl ModelDescriptor {
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn parent(&self) -> Option<&ParentSpec> {
        self.parent.as_ref()
    }

    pub fn base(&self) -> Option<&Arc<ModelDescriptor>> {
        self.base.as_ref()
    }

    pub fn validator(&self) -> &Validator<Snapshot> {
        &self.validator
    }

    pub fn validate(&self, snapshot: &Snapshot) -> Option<ValidationErrors> {
        (self.validator)(snapshot)
    }

    /// This descriptor followed by each base up the extension chain.
    pub fn lineage(&self) -> impl Iterator<Item = &ModelDescriptor> {
        std::iter::successors(Some(self), |descriptor| descriptor.base.as_deref())
    }

    /// True when `other` is this descriptor or one of its bases.
    pub fn extends(&self, other: &ModelDescriptor) -> bool {
        self.lineage().any(|descriptor| std::ptr::eq(descriptor, other))
    }

    /// Constructs a model from a snapshot or an initializer.
    ///
    /// A document passing [`crate::is_snapshot_document`] is rehydrated with
    /// `options` and no adapter calls; a `ref` that is not a document
    /// reference fails with [`Error::InvalidReference`]. Anything else is an
    /// initializer: it
    /// runs through the model's initializer and gets its type, id, reference
    /// and timestamps from the descriptor and `adapter`.
    pub fn construct(
        self: &Arc<Self>,
        adapter: &Adapter,
        input: Document,
        options: ConstructOptions,
    ) -> Result<Model> {
        if is_snapshot_document(&input) {
            let snapshot = Snapshot::try_from(input)?;
            Ok(self.rehydrate(Arc::new(snapshot), options))
        } else {
            self.instantiate(adapter, input)
        }
    }

    /// Constructs a model from a typed initializer.
    pub fn create<I>(self: &Arc<Self>, adapter: &Adapter, initializer: &I) -> Result<Model>
    where
        I: Serialize + ?Sized,
    {
        self.construct(adapter, to_document(initializer)?, ConstructOptions::default())
    }

    /// Wraps an existing snapshot without copying it.
    pub fn rehydrate(self: &Arc<Self>, snapshot: Arc<Snapshot>, options: ConstructOptions) -> Model {
        debug!(
            model = snapshot.type_name(),
            id = snapshot.id(),
            is_new = options.is_new,
            "rehydrated model"
        );
        Model::from_parts(
            Arc::clone(self),
            snapshot,
            options.updates.map(Arc::new),
            options.is_new,
        )
    }

    fn instantiate(self: &Arc<Self>, adapter: &Adapter, initializer: Document) -> Result<Model> {
        let parent = self.parent_reference(&initializer)?;

        let mut data = self.initialize(initializer)?;
        let derived = self.derived_fields(&data)?;
        if !derived.is_empty() {
            data = merge([&data, &derived]);
        }

        let type_name = match data.remove(TYPE) {
            Some(Value::String(type_name)) => type_name,
            _ => self
                .type_name
                .clone()
                .filter(|type_name| !type_name.is_empty())
                .ok_or(Error::MissingType)?,
        };
        let id = match data.remove(ID) {
            Some(Value::String(id)) => id,
            _ => self.generate_id(adapter),
        };
        let reference = adapter.reference(&self.collection, &id, parent.as_ref());
        data.remove(REF);
        data.remove(CREATED_AT);
        data.remove(UPDATED_AT);

        let now = adapter.server_timestamp();
        let snapshot = Snapshot::new(type_name, id, reference, now.clone(), now, data);
        debug!(
            model = snapshot.type_name(),
            id = snapshot.id(),
            path = snapshot.reference().path(),
            "created model"
        );

        Ok(Model::from_parts(Arc::clone(self), Arc::new(snapshot), None, true))
    }

    fn generate_id(&self, adapter: &Adapter) -> String {
        let id = adapter.generate_id();
        match &self.prefix {
            Some(prefix) => format!("{prefix}-{id}"),
            None => id,
        }
    }

    fn parent_reference(&self, initializer: &Document) -> Result<Option<DocumentReference>> {
        let Some(parent) = &self.parent else {
            return Ok(None);
        };
        initializer
            .get(&parent.attribute)
            .and_then(ModelRef::from_value)
            .map(|model_ref| Some(model_ref.reference().clone()))
            .ok_or_else(|| Error::MissingParentReference {
                attribute: parent.attribute.clone(),
            })
    }

    pub(crate) fn initialize(&self, init: Document) -> Result<Document> {
        match &self.initializer {
            Initializer::Inherited => match &self.base {
                Some(base) => base.initialize(init),
                None => Ok(init),
            },
            Initializer::Plain(initialize) => initialize(init),
            Initializer::Extending(initialize) => initialize(
                init,
                &BaseInitializer {
                    base: self.base.as_deref(),
                },
            ),
        }
    }

    /// Runs every derive hook in the chain, bases first, over `data`.
    pub(crate) fn derived_fields(&self, data: &Document) -> Result<Document> {
        let mut derived = match &self.base {
            Some(base) => base.derived_fields(data)?,
            None => Document::new(),
        };
        if let Some(derive) = &self.derive {
            let input = if derived.is_empty() {
                Cow::Borrowed(data)
            } else {
                Cow::Owned(merge([data, &derived]))
            };
            let own = derive(&input)?;
            derived = merge([&derived, &own]);
        }
        Ok(derived)
    }
}

/// Builder for a [`ModelDescriptor`].
///
/// ```ignore
/// let foo = ModelOptions::new("Foo", "foos")
///     .prefix("foo")
///     .derive(|data| Ok(doc! { "size" => data.get("value").and_then(Value::as_str).map_or(0, str::len) }))
///     .build();
/// ```
pub struct ModelOptions {
    type_name: Option<String>,
    collection: String,
    prefix: Option<String>,
    parent: Option<ParentSpec>,
    initializer: Initializer,
    derive: Option<DeriveFn>,
    validators: Vec<Validator<Snapshot>>,
    base: Option<Arc<ModelDescriptor>>,
}

impl ModelOptions {
    pub fn new(type_name: impl Into<String>, collection: impl Into<String>) -> Self {
        let mut options = Self::untyped(collection);
        options.type_name = Some(type_name.into());
        options
    }

    /// A model whose initializer supplies the `type` of each document.
    pub fn untyped(collection: impl Into<String>) -> Self {
        Self {
            type_name: None,
            collection: collection.into(),
            prefix: None,
            parent: None,
            initializer: Initializer::Inherited,
            derive: None,
            validators: Vec::new(),
            base: None,
        }
    }

    /// Starts a model extending `base`.
    ///
    /// The collection, prefix and parent are inherited and the type is
    /// replaced. The base's initializer, derive hooks and validator keep
    /// applying.
    pub fn extend(base: &Arc<ModelDescriptor>, type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            collection: base.collection.clone(),
            prefix: base.prefix.clone(),
            parent: base.parent.clone(),
            initializer: Initializer::Inherited,
            derive: None,
            validators: Vec::new(),
            base: Some(Arc::clone(base)),
        }
    }

    /// Generated ids become `<prefix>-<id>`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// New documents are nested under the parent model referenced by the
    /// initializer's `attribute`.
    pub fn parent(mut self, model: &Arc<ModelDescriptor>, attribute: impl Into<String>) -> Self {
        self.parent = Some(ParentSpec {
            model: Arc::clone(model),
            attribute: attribute.into(),
        });
        self
    }

    /// Maps an initializer to pre-snapshot data, replacing any inherited
    /// initializer.
    pub fn initialize<F>(mut self, initialize: F) -> Self
    where
        F: Fn(Document) -> Result<Document> + Send + Sync + 'static,
    {
        self.initializer = Initializer::Plain(Arc::new(initialize));
        self
    }

    /// [`ModelOptions::initialize`] over typed initializer and output.
    pub fn initialize_typed<I, O, F>(self, initialize: F) -> Self
    where
        I: DeserializeOwned + 'static,
        O: Serialize + 'static,
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        self.initialize(move |init| to_document(&initialize(from_document::<I>(&init)?)))
    }

    /// An initializer composing with the base model's initializer.
    pub fn initialize_extending<F>(mut self, initialize: F) -> Self
    where
        F: Fn(Document, &BaseInitializer<'_>) -> Result<Document> + Send + Sync + 'static,
    {
        self.initializer = Initializer::Extending(Arc::new(initialize));
        self
    }

    /// Computes derived fields from data.
    ///
    /// Runs when a model is created and again on every non-empty clone, so
    /// derived fields follow the fields they are computed from.
    pub fn derive<F>(mut self, derive: F) -> Self
    where
        F: Fn(&Document) -> Result<Document> + Send + Sync + 'static,
    {
        self.derive = Some(Arc::new(derive));
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Snapshot) -> Option<ValidationErrors> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn validators(mut self, validators: impl IntoIterator<Item = Validator<Snapshot>>) -> Self {
        self.validators.extend(validators);
        self
    }

    pub fn build(self) -> Arc<ModelDescriptor> {
        let validator = match &self.base {
            Some(base) => {
                let mut validators = vec![Arc::clone(&base.validator)];
                validators.extend(self.validators);
                combine(validators)
            }
            None if self.validators.is_empty() => always_valid(),
            None => combine(self.validators),
        };
        Arc::new(ModelDescriptor {
            type_name: self.type_name,
            collection: self.collection,
            prefix: self.prefix,
            parent: self.parent,
            initializer: self.initializer,
            derive: self.derive,
            validator,
            base: self.base,
        })
    }
}
