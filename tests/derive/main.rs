use serde::{Deserialize, Serialize};
use snapdm::{Adapter, ModelFields, ModelOptions};

#[derive(Debug, Serialize, Deserialize, ModelFields)]
#[serde(rename_all = "camelCase")]
struct TaskData {
    title: String,
    done: bool,
    due_date: Option<String>,
    #[serde(rename = "labels")]
    tags: Vec<String>,
    #[model(accessor = "text")]
    value: String,
    #[serde(skip)]
    scratch: u32,
}

#[derive(Debug, Serialize, Deserialize, ModelFields)]
#[model(fields_trait = "CounterAccess")]
struct CounterData {
    count: i64,
    #[model(skip)]
    note: Option<String>,
}

fn task() -> TaskData {
    TaskData {
        title: "write tests".into(),
        done: false,
        due_date: None,
        tags: vec!["home".into(), "urgent".into()],
        value: "v".into(),
        scratch: 7,
    }
}

#[test]
fn accessors_read_renamed_fields() {
    let adapter = Adapter::standard();
    let tasks = ModelOptions::new("Task", "tasks").build();

    let model = tasks.create(&adapter, &task()).unwrap();

    assert_eq!(model.title().unwrap(), "write tests");
    assert!(!model.done().unwrap());
    assert_eq!(model.due_date().unwrap(), None);
    assert_eq!(model.tags().unwrap(), ["home", "urgent"]);
    assert_eq!(model.text().unwrap(), "v");
    assert!(model.get("scratch").is_none());
    assert!(model.get("labels").is_some());
}

#[test]
fn accessors_follow_clones() {
    let adapter = Adapter::standard();
    let tasks = ModelOptions::new("Task", "tasks").build();
    let model = tasks.create(&adapter, &task()).unwrap();

    let next = model
        .clone_with(&adapter, snapdm::doc! { "done" => true, "dueDate" => "2026-11-01" })
        .unwrap();

    assert!(next.done().unwrap());
    assert_eq!(next.due_date().unwrap().as_deref(), Some("2026-11-01"));
    assert!(!model.done().unwrap());
}

#[test]
fn custom_trait_names_and_type_mismatches() {
    let adapter = Adapter::standard();
    let counters = ModelOptions::new("Counter", "counters").build();
    let counter = counters
        .create(&adapter, &CounterData { count: 3, note: None })
        .unwrap();

    assert_eq!(CounterAccess::count(&counter).unwrap(), 3);

    let broken = counter
        .clone_with(&adapter, snapdm::doc! { "count" => "three" })
        .unwrap();
    assert!(matches!(broken.count(), Err(snapdm::Error::Serialization(_))));
}
