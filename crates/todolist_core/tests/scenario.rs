use todolist_core::{AddEditTaskEvent, AppConfig, TaskFilter, TaskListEvent, TodoApp, UiEvent};

#[tokio::test]
async fn add_toggle_filter_delete_undo() {
    let dir = tempfile::tempdir().unwrap();
    let app = TodoApp::open(&AppConfig::with_database_file(dir.path().join("todo.db"))).unwrap();

    let mut list = app.task_list_view_state();
    let mut list_events = list.take_ui_events().unwrap();
    let mut tasks = list.filtered_tasks().await.unwrap();
    assert!(tasks.next().await.unwrap().is_empty());

    list.on_event(TaskListEvent::AddTaskClick).await.unwrap();
    let route = match list_events.recv().await {
        Some(UiEvent::Navigate(route)) => route,
        other => panic!("expected navigation, got {other:?}"),
    };

    let mut edit = app
        .edit_task_view_state_for_route(&route.to_string())
        .await
        .unwrap();
    edit.on_event(AddEditTaskEvent::TitleChanged("Buy milk".to_string()))
        .await
        .unwrap();
    edit.on_event(AddEditTaskEvent::DescriptionChanged(String::new()))
        .await
        .unwrap();
    edit.on_event(AddEditTaskEvent::SaveTaskClick).await.unwrap();

    let listed = tasks.next().await.unwrap();
    assert_eq!(listed.len(), 1);
    let task = listed[0].clone();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, None);
    assert!(!task.is_completed);

    list.on_event(TaskListEvent::DoneTaskClick(task.clone(), true))
        .await
        .unwrap();
    let done = tasks.next().await.unwrap();
    assert!(done[0].is_completed);

    list.on_event(TaskListEvent::FilterSelected(TaskFilter::Active))
        .await
        .unwrap();
    assert!(tasks.next().await.unwrap().is_empty());
    list.on_event(TaskListEvent::FilterSelected(TaskFilter::Completed))
        .await
        .unwrap();
    assert_eq!(tasks.next().await.unwrap(), done);

    list.on_event(TaskListEvent::FilterSelected(TaskFilter::All))
        .await
        .unwrap();
    tasks.next().await.unwrap();
    list.on_event(TaskListEvent::DeleteTaskClick(done[0].clone()))
        .await
        .unwrap();
    assert!(tasks.next().await.unwrap().is_empty());

    list.on_event(TaskListEvent::UndoDeleteClick).await.unwrap();
    let restored = tasks.next().await.unwrap();
    assert_eq!(restored, done);
    assert_eq!(restored[0].id, task.id);
}
