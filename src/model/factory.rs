use std::fmt;
use std::sync::Arc;

use super::{ConstructOptions, Model, ModelDescriptor};
use crate::adapter::Adapter;
use crate::error::Result;
use crate::value::Document;

type CustomFactory = Arc<dyn Fn(&Adapter, Document) -> Result<Model> + Send + Sync>;

/// How [`build_model`] turns data into a model: the descriptor's own
/// construction, or a caller-supplied factory for that model.
#[derive(Clone)]
pub enum ModelFactory {
    Descriptor(Arc<ModelDescriptor>),
    Custom {
        model: Arc<ModelDescriptor>,
        factory: CustomFactory,
    },
}

impl ModelFactory {
    pub fn custom<F>(model: &Arc<ModelDescriptor>, factory: F) -> Self
    where
        F: Fn(&Adapter, Document) -> Result<Model> + Send + Sync + 'static,
    {
        ModelFactory::Custom {
            model: Arc::clone(model),
            factory: Arc::new(factory),
        }
    }

    /// The descriptor of the models this factory builds.
    pub fn model(&self) -> &Arc<ModelDescriptor> {
        match self {
            ModelFactory::Descriptor(model) => model,
            ModelFactory::Custom { model, .. } => model,
        }
    }
}

impl From<Arc<ModelDescriptor>> for ModelFactory {
    fn from(model: Arc<ModelDescriptor>) -> Self {
        ModelFactory::Descriptor(model)
    }
}

impl fmt::Debug for ModelFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFactory::Descriptor(model) => f.debug_tuple("Descriptor").field(model).finish(),
            ModelFactory::Custom { model, .. } => f
                .debug_struct("Custom")
                .field("model", model)
                .finish_non_exhaustive(),
        }
    }
}

/// Builds a model from `data` (a snapshot or an initializer).
///
/// A custom factory receives the data unchanged. Otherwise the descriptor
/// constructs it with default options.
pub fn build_model(factory: &ModelFactory, adapter: &Adapter, data: Document) -> Result<Model> {
    match factory {
        ModelFactory::Descriptor(model) => {
            model.construct(adapter, data, ConstructOptions::default())
        }
        ModelFactory::Custom { factory, .. } => factory(adapter, data),
    }
}
