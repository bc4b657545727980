//! A deterministic adapter: sequential ids and a ticking server clock.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use snapdm::{Adapter, FieldValueFactory, SentinelFieldValues, Timestamp, Value};

/// Server timestamps are concrete and strictly increasing, one millisecond
/// per call, so every stamp an adapter hands out is distinct.
#[derive(Default)]
pub struct TickingFieldValues {
    millis: AtomicI64,
}

impl TickingFieldValues {
    pub fn starting_at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }
}

impl FieldValueFactory for TickingFieldValues {
    fn server_timestamp(&self) -> Value {
        let millis = self.millis.fetch_add(1, Ordering::SeqCst);
        Timestamp::from_millis(millis).into()
    }

    fn delete(&self) -> Value {
        SentinelFieldValues.delete()
    }

    fn array_union(&self, elements: Vec<Value>) -> Value {
        SentinelFieldValues.array_union(elements)
    }

    fn array_remove(&self, elements: Vec<Value>) -> Value {
        SentinelFieldValues.array_remove(elements)
    }

    fn increment(&self, operand: f64) -> Value {
        SentinelFieldValues.increment(operand)
    }
}

/// Ids `1`, `2`, `3`... and timestamps starting at the epoch.
pub fn test_adapter() -> Adapter {
    let next = Arc::new(AtomicU64::new(1));
    Adapter::builder()
        .ids(move || next.fetch_add(1, Ordering::SeqCst).to_string())
        .field_values(TickingFieldValues::starting_at(1_000))
        .build()
}
