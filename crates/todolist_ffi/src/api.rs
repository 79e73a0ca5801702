//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task list use-cases to Dart via FRB as sync calls.
//! - Drive the async core on a process-wide runtime.
//! - Keep one list view-state alive per session so undo spans calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every task call except `init_app` fails with a message until a session
//!   is open.
//! - Snackbar messages raised by a command are returned in that command's
//!   envelope, in emission order.

use log::{info, warn};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use todolist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, ping as ping_inner, AddEditTaskEvent, AppConfig, Task, TaskFilter,
    TaskId, TaskListEvent, TaskListViewState, TodoApp, UiEvent, UiEventReceiver,
};
use tokio::runtime::{Builder, Runtime};

const NOT_INITIALIZED_MESSAGE: &str = "app not initialized; call init_app first";

static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static SESSION: Mutex<Option<FfiSession>> = Mutex::new(None);

struct FfiSession {
    app: TodoApp,
    list: TaskListViewState,
    list_events: UiEventReceiver,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One task as shown to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    /// Epoch milliseconds of the last save.
    pub timestamp: i64,
}

impl From<Task> for TaskItem {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            is_completed: task.is_completed,
            timestamp: task.timestamp,
        }
    }
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    /// Filtered tasks, newest first. Empty on failure.
    pub items: Vec<TaskItem>,
    /// Filter applied to `items` (`all|active|completed`).
    pub applied_filter: String,
    pub message: String,
}

/// Single-task lookup envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGetResponse {
    pub ok: bool,
    /// `None` when no task has the requested id.
    pub item: Option<TaskItem>,
    pub message: String,
}

/// Generic command response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the command took effect.
    pub ok: bool,
    /// Id of the task the command touched, when there is one.
    pub task_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Action label offered next to `message` (for example `Undo`).
    pub action_label: Option<String>,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<TaskId>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
            action_label: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
            action_label: None,
        }
    }

    fn with_snackbar(mut self, events: Vec<UiEvent>) -> Self {
        for event in events {
            if let UiEvent::ShowSnackbar { message, action } = event {
                self.message = message;
                self.action_label = action;
            }
        }
        self
    }
}

/// Opens the task database described by `config_json` and starts a session.
///
/// Input semantics:
/// - `config_json`: serialized `AppConfig`; empty means in-memory database
///   with logging off.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Replaces any previously open session; the remembered deleted task of
///   the old session is discarded.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn init_app(config_json: String) -> TaskActionResponse {
    let config = match AppConfig::from_json_str(&config_json) {
        Ok(config) => config,
        Err(err) => return TaskActionResponse::failure(format!("init_app failed: {err}")),
    };
    if let Err(err) = init_logging_from_config(&config) {
        return TaskActionResponse::failure(format!("init_app failed: {err}"));
    }
    let app = match TodoApp::open(&config) {
        Ok(app) => app,
        Err(err) => return TaskActionResponse::failure(format!("init_app failed: {err}")),
    };

    let mut list = app.task_list_view_state();
    let Some(list_events) = list.take_ui_events() else {
        return TaskActionResponse::failure("init_app failed: list events already taken");
    };
    let replaced = lock_session()
        .replace(FfiSession {
            app,
            list,
            list_events,
        })
        .is_some();
    info!("event=ffi_init_app module=ffi status=ok replaced={replaced}");
    TaskActionResponse::success("App initialized.", None)
}

/// Closes the current session and releases its database.
///
/// # FFI contract
/// - Sync call; a no-op when no session is open.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn shutdown_app() -> TaskActionResponse {
    let closed = lock_session().take().is_some();
    info!("event=ffi_shutdown_app module=ffi status=ok closed={closed}");
    TaskActionResponse::success(
        if closed {
            "App closed."
        } else {
            "App was not initialized."
        },
        None,
    )
}

/// Lists tasks newest first.
///
/// Input semantics:
/// - `filter`: `all|active|completed`; `None` keeps the session's current
///   filter. A given filter stays selected for later calls.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(filter: Option<String>) -> TaskListResponse {
    let requested = match filter.as_deref().map(str::parse::<TaskFilter>).transpose() {
        Ok(requested) => requested,
        Err(err) => return list_failure(format!("tasks_list failed: {err}"), TaskFilter::All),
    };

    let result = with_session(|runtime, session| runtime.block_on(list_tasks(session, requested)));

    match result {
        Ok((filter, items)) => {
            let message = if items.is_empty() {
                "No tasks.".to_string()
            } else {
                format!("Found {} task(s).", items.len())
            };
            TaskListResponse {
                ok: true,
                items: items.into_iter().map(TaskItem::from).collect(),
                applied_filter: filter.to_string(),
                message,
            }
        }
        Err(err) => list_failure(
            format!("tasks_list failed: {err}"),
            requested.unwrap_or_default(),
        ),
    }
}

/// Loads one task by id.
#[flutter_rust_bridge::frb(sync)]
pub fn task_get(id: i64) -> TaskGetResponse {
    let result = with_session(|runtime, session| runtime.block_on(load_task(session, id)));

    match result {
        Ok(Some(task)) => TaskGetResponse {
            ok: true,
            item: Some(task.into()),
            message: "Task found.".to_string(),
        },
        Ok(None) => TaskGetResponse {
            ok: true,
            item: None,
            message: "Task not found.".to_string(),
        },
        Err(err) => TaskGetResponse {
            ok: false,
            item: None,
            message: format!("task_get failed: {err}"),
        },
    }
}

/// Creates or updates a task through the edit flow.
///
/// Input semantics:
/// - `id`: existing task id, or `None`/non-positive/unknown to create.
/// - `description`: blank means no description.
///
/// # FFI contract
/// - Blank titles are rejected with `ok=false` and the validation message;
///   nothing is written.
#[flutter_rust_bridge::frb(sync)]
pub fn task_save(
    id: Option<i64>,
    title: String,
    description: String,
    is_completed: bool,
) -> TaskActionResponse {
    let task_id = id.filter(|id| *id > 0);
    let fields = [
        AddEditTaskEvent::TitleChanged(title),
        AddEditTaskEvent::DescriptionChanged(description),
        AddEditTaskEvent::DoneChanged(is_completed),
    ];
    let result = with_session(|runtime, session| {
        runtime.block_on(save_task(session, task_id, fields))
    });

    match result {
        Ok((saved_id, events)) if events.contains(&UiEvent::PopBackStack) => {
            TaskActionResponse::success("Task saved.", saved_id)
        }
        Ok((_, events)) => TaskActionResponse::failure("Task not saved.").with_snackbar(events),
        Err(err) => TaskActionResponse::failure(format!("task_save failed: {err}")),
    }
}

/// Marks a task done or not done without moving it in the list.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: i64, done: bool) -> TaskActionResponse {
    let result = with_session(|runtime, session| {
        runtime.block_on(apply_to_task(session, id, |task| {
            TaskListEvent::DoneTaskClick(task, done)
        }))
    });

    match result {
        Ok(Some(_)) => TaskActionResponse::success(
            if done {
                "Task completed."
            } else {
                "Task reopened."
            },
            Some(id),
        ),
        Ok(None) => TaskActionResponse::failure(format!("task_toggle failed: no task {id}")),
        Err(err) => TaskActionResponse::failure(format!("task_toggle failed: {err}")),
    }
}

/// Deletes a task and remembers it for `task_undo_delete`.
///
/// Deleting an unknown id is a no-op reported with `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> TaskActionResponse {
    let result = with_session(|runtime, session| {
        runtime.block_on(apply_to_task(session, id, TaskListEvent::DeleteTaskClick))
    });

    match result {
        Ok(Some(events)) => TaskActionResponse::success("Task deleted.", Some(id))
            .with_snackbar(events),
        Ok(None) => TaskActionResponse::failure(format!("task_delete failed: no task {id}")),
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Restores the most recently deleted task with its original id.
///
/// A no-op (reported with `ok=false`) when nothing is remembered.
#[flutter_rust_bridge::frb(sync)]
pub fn task_undo_delete() -> TaskActionResponse {
    let result = with_session(|runtime, session| {
        let restored = session.list.last_deleted().map(|task| task.id);
        runtime.block_on(apply_list_event(session, TaskListEvent::UndoDeleteClick))?;
        Ok(restored)
    });

    match result {
        Ok(Some(id)) => TaskActionResponse::success("Task restored.", Some(id)),
        Ok(None) => TaskActionResponse::failure("Nothing to undo."),
        Err(err) => TaskActionResponse::failure(format!("task_undo_delete failed: {err}")),
    }
}

async fn list_tasks(
    session: &mut FfiSession,
    requested: Option<TaskFilter>,
) -> Result<(TaskFilter, Vec<Task>), String> {
    if let Some(filter) = requested {
        apply_list_event(session, TaskListEvent::FilterSelected(filter)).await?;
    }
    let mut tasks = session
        .list
        .filtered_tasks()
        .await
        .map_err(|err| err.to_string())?;
    let items = tasks
        .next()
        .await
        .ok_or_else(|| "task list closed".to_string())?;
    Ok((session.list.filter(), items))
}

async fn save_task(
    session: &FfiSession,
    task_id: Option<TaskId>,
    fields: [AddEditTaskEvent; 3],
) -> Result<(Option<TaskId>, Vec<UiEvent>), String> {
    let mut edit = session
        .app
        .edit_task_view_state(task_id)
        .await
        .map_err(|err| err.to_string())?;
    let mut events = edit
        .take_ui_events()
        .ok_or_else(|| "edit events already taken".to_string())?;
    for event in fields.into_iter().chain([AddEditTaskEvent::SaveTaskClick]) {
        edit.on_event(event).await.map_err(|err| err.to_string())?;
    }
    Ok((edit.state().task_id, events.drain()))
}

/// Applies the list command built from task `id`, then drains the list's
/// one-shot events. `Ok(None)` when no such task exists.
async fn apply_to_task(
    session: &mut FfiSession,
    id: TaskId,
    event: impl FnOnce(Task) -> TaskListEvent,
) -> Result<Option<Vec<UiEvent>>, String> {
    let Some(task) = load_task(session, id).await? else {
        return Ok(None);
    };
    apply_list_event(session, event(task)).await?;
    Ok(Some(session.list_events.drain()))
}

async fn apply_list_event(session: &mut FfiSession, event: TaskListEvent) -> Result<(), String> {
    session
        .list
        .on_event(event)
        .await
        .map_err(|err| err.to_string())
}

async fn load_task(session: &FfiSession, id: TaskId) -> Result<Option<Task>, String> {
    session
        .app
        .use_cases()
        .get_task_by_id
        .invoke(id)
        .await
        .map_err(|err| err.to_string())
}

fn list_failure(message: String, filter: TaskFilter) -> TaskListResponse {
    TaskListResponse {
        ok: false,
        items: Vec::new(),
        applied_filter: filter.to_string(),
        message,
    }
}

fn lock_session() -> MutexGuard<'static, Option<FfiSession>> {
    SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `f` against the open session, holding the session lock throughout.
fn with_session<T>(
    f: impl FnOnce(&Runtime, &mut FfiSession) -> Result<T, String>,
) -> Result<T, String> {
    let runtime = runtime()?;
    let mut guard = lock_session();
    let Some(session) = guard.as_mut() else {
        return Err(NOT_INITIALIZED_MESSAGE.to_string());
    };
    f(runtime, session)
}

fn runtime() -> Result<&'static Runtime, String> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("todolist-ffi")
        .enable_all()
        .build()
        .map_err(|err| {
            warn!("event=ffi_runtime module=ffi status=error error={err}");
            format!("runtime start failed: {err}")
        })?;
    // A concurrent caller may have won the race; its runtime is used.
    let _ = RUNTIME.set(runtime);
    RUNTIME
        .get()
        .ok_or_else(|| "runtime start failed".to_string())
}
