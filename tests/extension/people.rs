//! `Person`, extended by `Employee`, extended by `Manager`.

use std::sync::Arc;

use snapdm::{doc, violation, Error, ModelDescriptor, ModelOptions, Value};

pub fn person_model() -> Arc<ModelDescriptor> {
    ModelOptions::new("Person", "people")
        .prefix("person")
        .initialize(|init| {
            let name = init
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::initializer("name is required"))?;
            Ok(doc! { "name" => name, "displayName" => name.to_uppercase() })
        })
        .derive(|data| {
            let length = data.get("name").and_then(Value::as_str).map_or(0, str::len);
            Ok(doc! { "nameLength" => length })
        })
        .validator(|snapshot| {
            snapshot
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(str::is_empty)
                .then(|| violation("name", "must not be empty"))
        })
        .build()
}

pub fn employee_model(person: &Arc<ModelDescriptor>) -> Arc<ModelDescriptor> {
    ModelOptions::extend(person, "Employee")
        .initialize_extending(|init, base| {
            let mut data = base.initialize(init.clone())?;
            if let Some(employer) = init.get("employer") {
                data.insert("employer".into(), employer.clone());
            }
            Ok(data)
        })
        .validator(|snapshot| {
            snapshot
                .get("employer")
                .and_then(Value::as_str)
                .is_none()
                .then(|| violation("employer", "is required"))
        })
        .build()
}

pub fn manager_model(employee: &Arc<ModelDescriptor>) -> Arc<ModelDescriptor> {
    ModelOptions::extend(employee, "Manager")
        .initialize_extending(|init, base| {
            let mut data = base.initialize(init.clone())?;
            let reports = init
                .get("reports")
                .cloned()
                .unwrap_or_else(|| Value::from(Vec::<Value>::new()));
            data.insert("reports".into(), reports);
            Ok(data)
        })
        .derive(|data| {
            let count = data.get("reports").and_then(Value::as_array).map_or(0, <[Value]>::len);
            Ok(doc! { "reportCount" => count })
        })
        .build()
}
