use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A write-time sentinel understood by the persistence layer.
///
/// The core never interprets these; it only carries them inside snapshots
/// and updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fieldValue", rename_all = "camelCase")]
pub enum FieldValue {
    /// Set by the server at write time.
    ServerTimestamp,
    /// Delete the field.
    Delete,
    /// Append each element not already present in the stored array.
    ArrayUnion { elements: Vec<Value> },
    /// Remove every instance of each element from the stored array.
    ArrayRemove { elements: Vec<Value> },
    /// Add `operand` to the stored number.
    Increment { operand: f64 },
}

impl FieldValue {
    pub(crate) fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::ServerTimestamp => serde_json::json!({ "fieldValue": "serverTimestamp" }),
            FieldValue::Delete => serde_json::json!({ "fieldValue": "delete" }),
            FieldValue::ArrayUnion { elements } => serde_json::json!({
                "fieldValue": "arrayUnion",
                "elements": elements.iter().map(Value::to_json).collect::<Vec<_>>(),
            }),
            FieldValue::ArrayRemove { elements } => serde_json::json!({
                "fieldValue": "arrayRemove",
                "elements": elements.iter().map(Value::to_json).collect::<Vec<_>>(),
            }),
            FieldValue::Increment { operand } => serde_json::json!({
                "fieldValue": "increment",
                "operand": operand,
            }),
        }
    }
}

/// Produces field-value sentinels for the adapter.
///
/// Every method returns a [`Value`] so an adapter may hand back either a
/// sentinel or a concrete value. `server_timestamp` in particular is also
/// what the core stamps into `createdAt` and `updatedAt`.
pub trait FieldValueFactory: Send + Sync {
    fn server_timestamp(&self) -> Value;

    fn delete(&self) -> Value;

    fn array_union(&self, elements: Vec<Value>) -> Value;

    fn array_remove(&self, elements: Vec<Value>) -> Value;

    fn increment(&self, operand: f64) -> Value;
}

/// Returns [`FieldValue`] sentinels for everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentinelFieldValues;

impl FieldValueFactory for SentinelFieldValues {
    fn server_timestamp(&self) -> Value {
        FieldValue::ServerTimestamp.into()
    }

    fn delete(&self) -> Value {
        FieldValue::Delete.into()
    }

    fn array_union(&self, elements: Vec<Value>) -> Value {
        FieldValue::ArrayUnion { elements }.into()
    }

    fn array_remove(&self, elements: Vec<Value>) -> Value {
        FieldValue::ArrayRemove { elements }.into()
    }

    fn increment(&self, operand: f64) -> Value {
        FieldValue::Increment { operand }.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_matches_serde_form() {
        let sentinels = [
            FieldValue::ServerTimestamp,
            FieldValue::Delete,
            FieldValue::ArrayUnion {
                elements: vec![Value::from("a")],
            },
            FieldValue::ArrayRemove {
                elements: vec![Value::from(1)],
            },
            FieldValue::Increment { operand: 2.0 },
        ];
        for sentinel in sentinels {
            assert_eq!(serde_json::to_value(&sentinel).unwrap(), sentinel.to_json());
        }
    }

    #[test]
    fn sentinel_factory_wraps_values() {
        let values = SentinelFieldValues;
        assert_eq!(
            values.array_union(vec![Value::from("x")]).as_field_value(),
            Some(&FieldValue::ArrayUnion {
                elements: vec![Value::from("x")]
            })
        );
        assert_eq!(
            values.server_timestamp(),
            Value::FieldValue(FieldValue::ServerTimestamp)
        );
    }
}
