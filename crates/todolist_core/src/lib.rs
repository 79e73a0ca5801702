//! Core of the offline task list.
//!
//! Layers, leaf first: `db` -> `store` -> `repo` -> `service` -> `ui`, wired
//! together by `app`.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod ui;

pub use app::TodoApp;
pub use config::{AppConfig, ConfigError, DatabaseLocation};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::filter::TaskFilter;
pub use model::task::{now_epoch_ms, Task, TaskId, TaskValidationError, UNSET_TASK_ID};
pub use repo::task_repo::{RepoError, RepoResult, StoreTaskRepository, TaskRepository, TaskStream};
pub use service::task_usecases::{
    DeleteTaskUseCase, GetTaskByIdUseCase, GetTasksUseCase, TaskUseCases, UpsertTaskUseCase,
};
pub use store::{
    InMemoryTaskStore, LiveQuery, SqliteTaskStore, StoreError, StoreResult, TaskRecord, TaskStore,
};
pub use ui::edit_task::{AddEditTaskEvent, EditTaskState, EditTaskViewState};
pub use ui::event::{UiEvent, UiEventReceiver};
pub use ui::navigation::Route;
pub use ui::task_list::{FilteredTasks, TaskListEvent, TaskListState, TaskListViewState};
pub use ui::ViewStateError;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
