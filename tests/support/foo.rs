//! `Foo`, a prefixed model with a derived `size`, and `Bar`, nested under a
//! `Foo`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use snapdm::{doc, violation, ModelDescriptor, ModelOptions, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooInit {
    pub value: String,
}

pub fn foo_model() -> Arc<ModelDescriptor> {
    ModelOptions::new("Foo", "foos")
        .prefix("foo")
        .initialize_typed(|init: FooInit| init)
        .derive(|data| {
            let size = data.get("value").and_then(Value::as_str).map_or(0, str::len);
            Ok(doc! { "size" => size })
        })
        .validator(|snapshot| {
            let value = snapshot.get("value").and_then(Value::as_str).unwrap_or_default();
            value
                .contains("bad")
                .then(|| violation("value", "must not contain bad"))
        })
        .build()
}

pub fn bar_model(foo: &Arc<ModelDescriptor>) -> Arc<ModelDescriptor> {
    ModelOptions::new("Bar", "bars")
        .parent(foo, "foo")
        .build()
}
