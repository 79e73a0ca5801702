//! Composition root.
//!
//! Builds store, repository and use-cases in dependency order and hands out
//! view-states wired against them.

use crate::config::{AppConfig, DatabaseLocation};
use crate::model::task::TaskId;
use crate::repo::task_repo::{StoreTaskRepository, TaskRepository};
use crate::service::task_usecases::TaskUseCases;
use crate::store::{SqliteTaskStore, StoreResult, TaskStore};
use crate::ui::edit_task::EditTaskViewState;
use crate::ui::navigation::Route;
use crate::ui::task_list::TaskListViewState;
use crate::ui::ViewStateError;
use log::info;
use std::sync::Arc;

/// Wired application graph.
#[derive(Clone)]
pub struct TodoApp {
    use_cases: TaskUseCases,
}

impl TodoApp {
    /// Opens the configured database and wires every layer on top of it.
    pub fn open(config: &AppConfig) -> StoreResult<Self> {
        let store = match &config.database {
            DatabaseLocation::File(path) => SqliteTaskStore::open(path)?,
            DatabaseLocation::InMemory => SqliteTaskStore::open_in_memory()?,
        };
        info!(
            "event=app_wire module=app status=ok database={}",
            match config.database {
                DatabaseLocation::File(_) => "file",
                DatabaseLocation::InMemory => "memory",
            }
        );
        Ok(Self::with_store(Arc::new(store)))
    }

    /// Wires every layer on top of an existing store.
    pub fn with_store(store: Arc<dyn TaskStore>) -> Self {
        let repo: Arc<dyn TaskRepository> = Arc::new(StoreTaskRepository::new(store));
        Self {
            use_cases: TaskUseCases::new(repo),
        }
    }

    pub fn use_cases(&self) -> &TaskUseCases {
        &self.use_cases
    }

    pub fn task_list_view_state(&self) -> TaskListViewState {
        TaskListViewState::new(self.use_cases.clone())
    }

    pub async fn edit_task_view_state(
        &self,
        task_id: Option<TaskId>,
    ) -> Result<EditTaskViewState, ViewStateError> {
        EditTaskViewState::load(self.use_cases.clone(), task_id).await
    }

    /// Edit view-state for a route string; unknown or list routes open a
    /// blank form.
    pub async fn edit_task_view_state_for_route(
        &self,
        route: &str,
    ) -> Result<EditTaskViewState, ViewStateError> {
        let route = Route::parse(route).unwrap_or(Route::add_edit_task(None));
        EditTaskViewState::from_route(self.use_cases.clone(), &route).await
    }
}
