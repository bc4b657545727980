use super::{Document, Value};

/// Deep-merges `sources` left to right into a new document.
///
/// Nested maps merge key by key. Every other value, arrays included, is
/// replaced wholesale by the incoming value: arrays never merge index by
/// index, so a patch of `[]` empties a field and `["c"]` replaces
/// `["a", "b"]` outright. Partial array edits go through field-value
/// sentinels instead.
pub fn merge<'a, I>(sources: I) -> Document
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut merged = Document::new();
    for source in sources {
        merge_into(&mut merged, source);
    }
    merged
}

fn merge_into(target: &mut Document, source: &Document) {
    for (key, incoming) in source {
        match (target.get_mut(key), incoming) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => merge_into(existing, incoming),
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn nested_maps_merge() {
        let a = doc! { "a" => doc! { "x" => 1, "y" => 2 }, "keep" => true };
        let b = doc! { "a" => doc! { "y" => 3, "z" => 4 } };

        let merged = merge([&a, &b]);

        assert_eq!(
            merged,
            doc! { "a" => doc! { "x" => 1, "y" => 3, "z" => 4 }, "keep" => true }
        );
    }

    #[test]
    fn arrays_are_replaced() {
        let a = doc! { "array" => vec!["a", "b"] };

        let emptied = merge([&a, &doc! { "array" => Vec::<Value>::new() }]);
        assert_eq!(emptied.get("array"), Some(&Value::Array(vec![])));

        let replaced = merge([&a, &doc! { "array" => vec!["c"] }]);
        assert_eq!(replaced.get("array"), Some(&Value::from(vec!["c"])));
    }

    #[test]
    fn map_replaces_scalar_and_scalar_replaces_map() {
        let a = doc! { "x" => 1, "y" => doc! { "inner" => 1 } };
        let b = doc! { "x" => doc! { "inner" => 2 }, "y" => "flat" };

        let merged = merge([&a, &b]);

        assert_eq!(merged, b);
    }

    #[test]
    fn sources_are_untouched() {
        let a = doc! { "a" => doc! { "x" => 1 } };
        let b = doc! { "a" => doc! { "x" => 2 } };
        let before = a.clone();

        let _ = merge([&a, &b]);

        assert_eq!(a, before);
    }

    #[test]
    fn no_sources_is_empty() {
        assert!(merge(std::iter::empty::<&Document>()).is_empty());
    }
}
