mod people;

use std::sync::Arc;

use people::{employee_model, manager_model, person_model};
use snapdm::{doc, violation, Adapter, ConstructOptions, Error, Model, ModelDescriptor, ModelOptions, Value};

fn build(model: &Arc<ModelDescriptor>, adapter: &Adapter, init: snapdm::Document) -> Model {
    model
        .construct(adapter, init, ConstructOptions::default())
        .unwrap()
}

#[test]
fn extension_inherits_collection_prefix_and_replaces_type() {
    let adapter = Adapter::standard();
    let employees = employee_model(&person_model());

    let ann = build(&employees, &adapter, doc! { "name" => "ann", "employer" => "acme" });

    assert_eq!(employees.type_name(), Some("Employee"));
    assert_eq!(employees.collection(), "people");
    assert_eq!(employees.prefix(), Some("person"));
    assert_eq!(ann.type_name(), "Employee");
    assert!(ann.id().starts_with("person-"));
    assert!(ann.reference().path().starts_with("people/person-"));
}

#[test]
fn extending_initializer_composes_with_the_base() {
    let adapter = Adapter::standard();
    let employees = employee_model(&person_model());

    let ann = build(&employees, &adapter, doc! { "name" => "ann", "employer" => "acme" });

    assert_eq!(ann.get("displayName"), Some(&Value::from("ANN")));
    assert_eq!(ann.get("employer"), Some(&Value::from("acme")));
    assert_eq!(ann.get("nameLength"), Some(&Value::from(3)));
}

#[test]
fn omitted_initializer_is_inherited() {
    let adapter = Adapter::standard();
    let contractors = ModelOptions::extend(&person_model(), "Contractor").build();

    let bob = build(&contractors, &adapter, doc! { "name" => "bob" });

    assert_eq!(bob.type_name(), "Contractor");
    assert_eq!(bob.get("displayName"), Some(&Value::from("BOB")));
}

#[test]
fn base_initializer_errors_propagate() {
    let adapter = Adapter::standard();
    let employees = employee_model(&person_model());

    let err = employees
        .construct(&adapter, doc! { "employer" => "acme" }, ConstructOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::Initializer(ref message) if message == "name is required"));
}

#[test]
fn derived_validator_rejects_what_the_base_rejects() {
    let adapter = Adapter::standard();
    let persons = person_model();
    let employees = employee_model(&persons);

    let nameless = build(&employees, &adapter, doc! { "name" => "", "employer" => "acme" });
    let jobless = build(&employees, &adapter, doc! { "name" => "ann" });
    let neither = build(&employees, &adapter, doc! { "name" => "" });
    let fine = build(&employees, &adapter, doc! { "name" => "ann", "employer" => "acme" });

    assert_eq!(nameless.validate(), Some(violation("name", "must not be empty")));
    assert_eq!(jobless.validate(), Some(violation("employer", "is required")));
    let mut both = violation("name", "must not be empty");
    both.insert("employer".into(), "is required".into());
    assert_eq!(neither.validate(), Some(both));
    assert_eq!(fine.validate(), None);

    // The base validator alone is untouched by the extension.
    assert_eq!(persons.validate(jobless.snapshot()), None);
}

#[test]
fn chains_are_linear_and_inspectable() {
    let persons = person_model();
    let employees = employee_model(&persons);
    let managers = manager_model(&employees);

    let lineage: Vec<_> = managers.lineage().filter_map(ModelDescriptor::type_name).collect();

    assert_eq!(lineage, ["Manager", "Employee", "Person"]);
    assert!(managers.extends(&persons));
    assert!(managers.extends(&managers));
    assert!(!persons.extends(&managers));
    assert!(Arc::ptr_eq(managers.base().unwrap(), &employees));
    assert!(persons.base().is_none());
}

#[test]
fn chained_models_run_every_initializer_and_derive_hook() {
    let adapter = Adapter::standard();
    let managers = manager_model(&employee_model(&person_model()));

    let cat = build(
        &managers,
        &adapter,
        doc! { "name" => "cat", "employer" => "acme", "reports" => vec!["ann", "bob"] },
    );

    assert_eq!(cat.get("displayName"), Some(&Value::from("CAT")));
    assert_eq!(cat.get("employer"), Some(&Value::from("acme")));
    assert_eq!(cat.get("nameLength"), Some(&Value::from(3)));
    assert_eq!(cat.get("reportCount"), Some(&Value::from(2)));
    assert_eq!(cat.validate(), None);

    let renamed = cat
        .clone_with(&adapter, doc! { "name" => "catherine", "reports" => vec!["ann"] })
        .unwrap();

    let updates = renamed.updates().unwrap();
    assert_eq!(updates.get("nameLength"), Some(&Value::from(9)));
    assert_eq!(updates.get("reportCount"), Some(&Value::from(1)));
    assert_eq!(updates.get("reports"), Some(&Value::from(vec!["ann"])));
}

#[test]
fn unchanged_derived_fields_stay_out_of_updates() {
    let adapter = Adapter::standard();
    let managers = manager_model(&employee_model(&person_model()));
    let cat = build(&managers, &adapter, doc! { "name" => "cat", "employer" => "acme" });

    let next = cat.clone_with(&adapter, doc! { "employer" => "globex" }).unwrap();

    let updates = next.updates().unwrap();
    assert!(updates.get("nameLength").is_none());
    assert!(updates.get("reportCount").is_none());
    assert_eq!(next.get("reportCount"), Some(&Value::from(0)));
}

#[test]
fn base_initializer_exposes_the_base_descriptor() {
    let adapter = Adapter::standard();
    let persons = person_model();
    let tagged = ModelOptions::extend(&persons, "Tagged")
        .initialize_extending(|init, base| {
            let mut data = base.initialize(init)?;
            let base_type = base.descriptor().and_then(ModelDescriptor::type_name);
            data.insert("baseType".into(), Value::from(base_type.unwrap_or_default()));
            Ok(data)
        })
        .build();

    let dan = build(&tagged, &adapter, doc! { "name" => "dan" });

    assert_eq!(dan.get("baseType"), Some(&Value::from("Person")));
}
