use std::sync::Arc;
use todolist_core::ui::event::{TASK_DELETED_MESSAGE, UNDO_ACTION_LABEL};
use todolist_core::{
    InMemoryTaskStore, Route, Task, TaskFilter, TaskListEvent, TaskListViewState, TodoApp,
    UiEvent,
};

fn app() -> TodoApp {
    TodoApp::with_store(Arc::new(InMemoryTaskStore::new()))
}

async fn add(app: &TodoApp, title: &str, done: bool, timestamp: i64) -> Task {
    let id = app
        .use_cases()
        .upsert_task
        .invoke(&Task::new(title, None, done, timestamp))
        .await
        .unwrap();
    app.use_cases()
        .get_task_by_id
        .invoke(id)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn filtered_list_recomputes_when_filter_changes() {
    let app = app();
    let open = add(&app, "open", false, 2).await;
    let done = add(&app, "done", true, 1).await;
    let mut view_state = app.task_list_view_state();
    let mut tasks = view_state.filtered_tasks().await.unwrap();

    assert_eq!(tasks.next().await.unwrap(), vec![open.clone(), done.clone()]);

    view_state
        .on_event(TaskListEvent::FilterSelected(TaskFilter::Active))
        .await
        .unwrap();
    assert_eq!(tasks.next().await.unwrap(), vec![open]);

    view_state
        .on_event(TaskListEvent::FilterSelected(TaskFilter::Completed))
        .await
        .unwrap();
    assert_eq!(tasks.next().await.unwrap(), vec![done]);
    assert_eq!(view_state.filter(), TaskFilter::Completed);
}

#[tokio::test]
async fn filtered_list_recomputes_when_tasks_change() {
    let app = app();
    let mut view_state = app.task_list_view_state();
    view_state
        .on_event(TaskListEvent::FilterSelected(TaskFilter::Completed))
        .await
        .unwrap();
    let mut tasks = view_state.filtered_tasks().await.unwrap();
    assert!(tasks.next().await.unwrap().is_empty());

    let task = add(&app, "soon done", false, 1).await;
    assert!(tasks.next().await.unwrap().is_empty());

    view_state
        .on_event(TaskListEvent::DoneTaskClick(task.clone(), true))
        .await
        .unwrap();
    let completed = tasks.next().await.unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, task.id);
}

#[tokio::test]
async fn toggle_done_rewrites_record_but_keeps_timestamp() {
    let app = app();
    let task = add(&app, "keep order", false, 1234).await;
    let mut view_state = app.task_list_view_state();

    view_state
        .on_event(TaskListEvent::DoneTaskClick(task.clone(), true))
        .await
        .unwrap();

    let stored = app
        .use_cases()
        .get_task_by_id
        .invoke(task.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_completed);
    assert_eq!(stored.timestamp, 1234);
    assert_eq!(stored.title, task.title);
}

#[tokio::test]
async fn delete_remembers_task_and_offers_undo() {
    let app = app();
    let task = add(&app, "oops", false, 1).await;
    let mut view_state = app.task_list_view_state();
    let mut events = view_state.take_ui_events().unwrap();

    view_state
        .on_event(TaskListEvent::DeleteTaskClick(task.clone()))
        .await
        .unwrap();

    assert_eq!(view_state.last_deleted(), Some(&task));
    assert_eq!(
        events.recv().await,
        Some(UiEvent::ShowSnackbar {
            message: TASK_DELETED_MESSAGE.to_string(),
            action: Some(UNDO_ACTION_LABEL.to_string()),
        })
    );
    assert!(app
        .use_cases()
        .get_task_by_id
        .invoke(task.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn undo_restores_exact_task_and_second_undo_is_noop() {
    let app = app();
    let task = add(&app, "come back", true, 99).await;
    let mut view_state = app.task_list_view_state();
    let mut tasks = view_state.filtered_tasks().await.unwrap();
    tasks.next().await.unwrap();

    view_state
        .on_event(TaskListEvent::DeleteTaskClick(task.clone()))
        .await
        .unwrap();
    assert!(tasks.next().await.unwrap().is_empty());

    view_state
        .on_event(TaskListEvent::UndoDeleteClick)
        .await
        .unwrap();
    assert_eq!(tasks.next().await.unwrap(), vec![task.clone()]);
    assert_eq!(view_state.last_deleted(), None);

    view_state
        .on_event(TaskListEvent::UndoDeleteClick)
        .await
        .unwrap();
    assert_eq!(tasks.current_snapshot(), Some(vec![task]));
}

#[tokio::test]
async fn second_delete_overwrites_the_undo_slot() {
    let app = app();
    let first = add(&app, "first", false, 1).await;
    let second = add(&app, "second", false, 2).await;
    let mut view_state = app.task_list_view_state();

    view_state
        .on_event(TaskListEvent::DeleteTaskClick(first.clone()))
        .await
        .unwrap();
    view_state
        .on_event(TaskListEvent::DeleteTaskClick(second.clone()))
        .await
        .unwrap();
    view_state
        .on_event(TaskListEvent::UndoDeleteClick)
        .await
        .unwrap();

    let get = &app.use_cases().get_task_by_id;
    assert_eq!(get.invoke(second.id).await.unwrap(), Some(second));
    assert_eq!(get.invoke(first.id).await.unwrap(), None);
}

#[tokio::test]
async fn open_and_add_emit_navigation_events_in_order() {
    let app = app();
    let task = add(&app, "details", false, 1).await;
    let mut view_state = app.task_list_view_state();
    let mut events = view_state.take_ui_events().unwrap();
    assert!(view_state.take_ui_events().is_none());

    view_state
        .on_event(TaskListEvent::TaskClick(task.clone()))
        .await
        .unwrap();
    view_state
        .on_event(TaskListEvent::AddTaskClick)
        .await
        .unwrap();

    assert_eq!(
        events.drain(),
        vec![
            UiEvent::Navigate(Route::AddEditTask {
                task_id: Some(task.id)
            }),
            UiEvent::Navigate(Route::AddEditTask { task_id: None }),
        ]
    );
}

#[tokio::test]
async fn filtered_list_ends_when_view_state_is_dropped() {
    let app = app();
    let view_state: TaskListViewState = app.task_list_view_state();
    let mut tasks = view_state.filtered_tasks().await.unwrap();
    tasks.next().await.unwrap();
    drop(view_state);

    assert_eq!(tasks.next().await, None);
}
