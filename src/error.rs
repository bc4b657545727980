use thiserror::Error;

/// Errors raised while configuring the adapter or constructing models.
///
/// Every variant describes a programming or configuration defect. Validation
/// failures are not errors; see [`crate::ValidationErrors`].
#[derive(Debug, Error)]
pub enum Error {
    /// The process-wide adapter was read before [`crate::initialize`] ran.
    #[error("adapter not set; call `initialize` before creating models")]
    AdapterNotInitialized,

    /// [`crate::initialize`] was called a second time.
    #[error("adapter already initialized")]
    AlreadyInitialized,

    /// Neither the initialized data nor the model declares a type.
    #[error("model type is not defined")]
    MissingType,

    /// The parent attribute is absent or does not hold a model reference.
    #[error("attribute `{attribute}` must hold a model reference with a type, id and ref")]
    MissingParentReference { attribute: String },

    /// A stored snapshot's `ref` cannot be read as a document reference.
    #[error("snapshot `ref` is not a document reference: {found}")]
    InvalidReference { found: String },

    /// A clone patch tried to rewrite an identity attribute.
    #[error("identity attribute `{field}` cannot be patched")]
    IdentityPatch { field: String },

    /// A document lacks the identity attributes of a snapshot.
    #[error("document is not a snapshot: it needs a string type and id plus ref, createdAt and updatedAt")]
    NotASnapshot,

    /// A typed value did not serialize to a document map.
    #[error("expected a document map, found {found}")]
    NotADocument { found: &'static str },

    /// Raised by model initializers.
    #[error("initializer failed: {0}")]
    Initializer(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for initializer failures.
    pub fn initializer(message: impl Into<String>) -> Self {
        Error::Initializer(message.into())
    }
}

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;
