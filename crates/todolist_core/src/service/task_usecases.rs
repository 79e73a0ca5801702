//! The four task use-cases: list, get-by-id, upsert and delete.

use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{RepoResult, TaskRepository, TaskStream};
use std::sync::Arc;

/// Opens the live, newest-first task list.
#[derive(Clone)]
pub struct GetTasksUseCase {
    repo: Arc<dyn TaskRepository>,
}

impl GetTasksUseCase {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn invoke(&self) -> RepoResult<TaskStream> {
        self.repo.get_all_tasks().await
    }
}

/// Reads one task. A missing task is `Ok(None)`, not an error.
#[derive(Clone)]
pub struct GetTaskByIdUseCase {
    repo: Arc<dyn TaskRepository>,
}

impl GetTaskByIdUseCase {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn invoke(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task_by_id(id).await
    }
}

/// Inserts or fully replaces a task, returning its id.
#[derive(Clone)]
pub struct UpsertTaskUseCase {
    repo: Arc<dyn TaskRepository>,
}

impl UpsertTaskUseCase {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn invoke(&self, task: &Task) -> RepoResult<TaskId> {
        self.repo.upsert_task(task).await
    }
}

/// Removes a task. Deleting an absent task is a no-op.
#[derive(Clone)]
pub struct DeleteTaskUseCase {
    repo: Arc<dyn TaskRepository>,
}

impl DeleteTaskUseCase {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn invoke(&self, task: &Task) -> RepoResult<()> {
        self.repo.delete_task(task).await
    }
}

/// All task use-cases wired against one repository.
#[derive(Clone)]
pub struct TaskUseCases {
    pub get_tasks: GetTasksUseCase,
    pub get_task_by_id: GetTaskByIdUseCase,
    pub upsert_task: UpsertTaskUseCase,
    pub delete_task: DeleteTaskUseCase,
}

impl TaskUseCases {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self {
            get_tasks: GetTasksUseCase::new(Arc::clone(&repo)),
            get_task_by_id: GetTaskByIdUseCase::new(Arc::clone(&repo)),
            upsert_task: UpsertTaskUseCase::new(Arc::clone(&repo)),
            delete_task: DeleteTaskUseCase::new(repo),
        }
    }
}
