use todolist_core::{Task, TaskFilter, UNSET_TASK_ID};

#[test]
fn task_serialization_uses_snake_case_fields() {
    let mut task = Task::new("Buy milk", Some("2 liters".to_string()), true, 1_700_000_000_000);
    task.id = 12;

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], 12);
    assert_eq!(json["title"], "Buy milk");
    assert_eq!(json["description"], "2 liters");
    assert_eq!(json["is_completed"], true);
    assert_eq!(json["timestamp"], 1_700_000_000_000_i64);

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn missing_id_and_flag_deserialize_as_unsaved_active_task() {
    let task: Task = serde_json::from_value(serde_json::json!({
        "title": "draft",
        "description": null,
        "timestamp": 5
    }))
    .unwrap();

    assert_eq!(task.id, UNSET_TASK_ID);
    assert!(!task.is_completed);
    assert!(!task.is_persisted());
}

#[test]
fn filter_serializes_as_lowercase_label() {
    assert_eq!(
        serde_json::to_value(TaskFilter::Completed).unwrap(),
        serde_json::json!("completed")
    );
    assert_eq!(TaskFilter::default(), TaskFilter::All);
}
