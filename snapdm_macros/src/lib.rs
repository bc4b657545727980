mod model_fields;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(ModelFields)] derive macro
// ============================================================================

/// Derive macro generating typed field accessors on `snapdm::Model`.
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize, ModelFields)]
/// #[serde(rename_all = "camelCase")]
/// struct FooData {
///     value: String,
///     value_size: usize,
///     #[model(skip)]
///     scratch: Option<String>,
/// }
///
/// use FooDataFields;
/// let size: usize = foo.value_size()?; // reads "valueSize"
/// ```
///
/// This generates a `FooDataFields` trait with one method per field, each
/// returning `snapdm::Result<FieldType>`, and implements it for
/// `snapdm::Model`.
///
/// - Document keys follow `#[serde(rename = "...")]` and the struct-level
///   `#[serde(rename_all = "...")]`.
/// - `#[serde(skip)]` and `#[model(skip)]` fields get no accessor.
/// - `#[model(accessor = "...")]` renames the generated method, useful when a
///   field collides with an inherent `Model` method such as `id`.
/// - `#[model(fields_trait = "...")]` on the struct renames the trait.
#[proc_macro_derive(ModelFields, attributes(model))]
pub fn derive_model_fields(input: TokenStream) -> TokenStream {
    model_fields::derive_model_fields(input)
}
