use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Locates a document: its id, its containing collection and its full path.
///
/// Paths alternate collection and document segments, so a document nested
/// under a parent document has the parent's path prepended:
/// `foos/f1/bars/b1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentReference {
    id: String,
    parent: CollectionReference,
    path: String,
}

/// A collection, optionally nested under a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionReference {
    id: String,
    parent: Option<Box<DocumentReference>>,
    path: String,
}

impl DocumentReference {
    pub fn new(collection: &str, id: &str, parent: Option<&DocumentReference>) -> Self {
        let collection = CollectionReference::new(collection, parent);
        Self {
            id: id.to_string(),
            path: format!("{}/{}", collection.path, id),
            parent: collection,
        }
    }

    /// Parses a slash-separated document path.
    ///
    /// Returns `None` unless the path has an even, non-zero number of
    /// non-empty segments.
    pub fn from_path(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments.is_empty()
            || segments.len() % 2 != 0
            || segments.iter().any(|segment| segment.is_empty())
        {
            return None;
        }
        segments
            .chunks(2)
            .fold(None, |parent: Option<DocumentReference>, pair| {
                Some(DocumentReference::new(pair[0], pair[1], parent.as_ref()))
            })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> &CollectionReference {
        &self.parent
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The id of the collection holding this document.
    pub fn collection_id(&self) -> &str {
        self.parent.id()
    }

    pub(crate) fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "id": self.id, "path": self.path })
    }
}

impl CollectionReference {
    fn new(id: &str, parent: Option<&DocumentReference>) -> Self {
        let path = match parent {
            Some(parent) => format!("{}/{}", parent.path, id),
            None => id.to_string(),
        };
        Self {
            id: id.to_string(),
            parent: parent.cloned().map(Box::new),
            path,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The containing document when this is a subcollection.
    pub fn parent(&self) -> Option<&DocumentReference> {
        self.parent.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl Serialize for DocumentReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("DocumentReference", 2)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("path", &self.path)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for DocumentReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            path: String,
        }

        let repr = Repr::deserialize(deserializer)?;
        DocumentReference::from_path(&repr.path)
            .ok_or_else(|| de::Error::custom(format!("invalid document path `{}`", repr.path)))
    }
}

/// Builds document references for the adapter.
pub trait ReferenceFactory: Send + Sync {
    fn reference(
        &self,
        collection: &str,
        id: &str,
        parent: Option<&DocumentReference>,
    ) -> DocumentReference;
}

impl<F> ReferenceFactory for F
where
    F: Fn(&str, &str, Option<&DocumentReference>) -> DocumentReference + Send + Sync,
{
    fn reference(
        &self,
        collection: &str,
        id: &str,
        parent: Option<&DocumentReference>,
    ) -> DocumentReference {
        self(collection, id, parent)
    }
}

/// Builds plain path references with [`DocumentReference::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PathReferences;

impl ReferenceFactory for PathReferences {
    fn reference(
        &self,
        collection: &str,
        id: &str,
        parent: Option<&DocumentReference>,
    ) -> DocumentReference {
        DocumentReference::new(collection, id, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_reference() {
        let reference = DocumentReference::new("foos", "f1", None);
        assert_eq!(reference.id(), "f1");
        assert_eq!(reference.path(), "foos/f1");
        assert_eq!(reference.collection_id(), "foos");
        assert!(reference.parent().parent().is_none());
    }

    #[test]
    fn nested_reference_prepends_parent_path() {
        let foo = DocumentReference::new("foos", "f1", None);
        let bar = DocumentReference::new("bars", "b1", Some(&foo));

        assert_eq!(bar.path(), "foos/f1/bars/b1");
        assert_eq!(bar.parent().path(), "foos/f1/bars");
        assert_eq!(bar.parent().parent(), Some(&foo));
    }

    #[test]
    fn from_path_rebuilds_the_chain() {
        let foo = DocumentReference::new("foos", "f1", None);
        let bar = DocumentReference::new("bars", "b1", Some(&foo));

        assert_eq!(DocumentReference::from_path("foos/f1/bars/b1"), Some(bar));
        assert_eq!(DocumentReference::from_path("foos"), None);
        assert_eq!(DocumentReference::from_path("foos//bars/b1"), None);
        assert_eq!(DocumentReference::from_path(""), None);
    }

    #[test]
    fn serializes_as_id_and_path() {
        let reference = DocumentReference::new("foos", "f1", None);
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "f1", "path": "foos/f1" }));

        let back: DocumentReference = serde_json::from_value(json).unwrap();
        assert_eq!(back, reference);
    }
}
