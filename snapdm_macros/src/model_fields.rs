use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr};

pub fn derive_model_fields(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "ModelFields derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "ModelFields derive only supports structs",
            ))
        }
    };

    let attrs = parse_struct_attrs(input)?;
    let trait_name = match attrs.fields_trait {
        Some(trait_name) => format_ident!("{}", trait_name),
        None => format_ident!("{}Fields", name),
    };

    let mut signatures = Vec::new();
    let mut methods = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_attrs = parse_field_attrs(field)?;
        if field_attrs.skip {
            continue;
        }

        let ty = &field.ty;
        let field_name = ident.unraw().to_string();
        let key = field_attrs
            .rename
            .unwrap_or_else(|| apply_rename_all(&field_name, attrs.rename_all.as_deref()));
        let accessor = match field_attrs.accessor {
            Some(accessor) => format_ident!("{}", accessor),
            None => ident.clone(),
        };
        let doc = format!("Reads `{key}` from the model's snapshot.");

        signatures.push(quote! {
            #[doc = #doc]
            fn #accessor(&self) -> ::snapdm::Result<#ty>;
        });
        methods.push(quote! {
            fn #accessor(&self) -> ::snapdm::Result<#ty> {
                self.get_as::<#ty>(#key)
            }
        });
    }

    let trait_doc = format!("Typed accessors for the fields of [`{name}`].");
    Ok(quote! {
        #[doc = #trait_doc]
        #vis trait #trait_name {
            #(#signatures)*
        }

        impl #trait_name for ::snapdm::Model {
            #(#methods)*
        }
    })
}

#[derive(Default)]
struct StructAttrs {
    rename_all: Option<String>,
    fields_trait: Option<String>,
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    rename: Option<String>,
    accessor: Option<String>,
}

fn parse_struct_attrs(input: &DeriveInput) -> syn::Result<StructAttrs> {
    let mut attrs = StructAttrs::default();

    for attr in &input.attrs {
        if attr.path().is_ident("serde") {
            // Other serde options are serde's business.
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.rename_all = Some(value.value());
                } else if meta.input.peek(syn::Token![=]) {
                    meta.value()?.parse::<syn::Expr>()?;
                }
                Ok(())
            });
        } else if attr.path().is_ident("model") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("fields_trait") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.fields_trait = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported model attribute"))
                }
            })?;
        }
    }

    if let Some(rule) = &attrs.rename_all {
        if !RENAME_RULES.contains(&rule.as_str()) {
            return Err(syn::Error::new_spanned(
                &input.ident,
                format!("unsupported rename_all rule `{rule}`"),
            ));
        }
    }

    Ok(attrs)
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in &field.attrs {
        if attr.path().is_ident("serde") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.rename = Some(value.value());
                } else if meta.input.peek(syn::Token![=]) {
                    meta.value()?.parse::<syn::Expr>()?;
                }
                Ok(())
            });
        } else if attr.path().is_ident("model") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    Ok(())
                } else if meta.path.is_ident("accessor") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.accessor = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported model attribute"))
                }
            })?;
        }
    }

    Ok(attrs)
}

const RENAME_RULES: [&str; 8] = [
    "lowercase",
    "UPPERCASE",
    "PascalCase",
    "camelCase",
    "snake_case",
    "SCREAMING_SNAKE_CASE",
    "kebab-case",
    "SCREAMING-KEBAB-CASE",
];

/// Serde's `rename_all` rules, applied to a snake_case field name.
fn apply_rename_all(field: &str, rule: Option<&str>) -> String {
    match rule {
        Some("lowercase") | Some("snake_case") | None => field.to_string(),
        Some("UPPERCASE") | Some("SCREAMING_SNAKE_CASE") => field.to_ascii_uppercase(),
        Some("kebab-case") => field.replace('_', "-"),
        Some("SCREAMING-KEBAB-CASE") => field.replace('_', "-").to_ascii_uppercase(),
        Some("PascalCase") => to_pascal_case(field),
        Some("camelCase") => {
            let pascal = to_pascal_case(field);
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => pascal,
            }
        }
        Some(_) => field.to_string(),
    }
}

fn to_pascal_case(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
