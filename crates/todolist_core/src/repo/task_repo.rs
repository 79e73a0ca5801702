//! Task repository contract and store-backed implementation.

use crate::model::task::{Task, TaskId};
use crate::store::{LiveQuery, StoreError, TaskRecord, TaskStore};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error. Wraps storage failures unchanged.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            is_completed: record.is_completed,
            timestamp: record.timestamp,
        }
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            is_completed: task.is_completed,
            timestamp: task.timestamp,
        }
    }
}

/// Live list of domain tasks, newest first.
#[derive(Debug)]
pub struct TaskStream {
    records: LiveQuery<TaskRecord>,
}

impl TaskStream {
    /// Waits for the next full snapshot. `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Vec<Task>> {
        self.records.next().await.map(|snapshot| to_tasks(&snapshot))
    }

    /// Newest snapshot already delivered, without waiting.
    pub fn try_latest(&mut self) -> Option<Vec<Task>> {
        self.records.try_latest().map(|snapshot| to_tasks(&snapshot))
    }
}

fn to_tasks(records: &[TaskRecord]) -> Vec<Task> {
    records.iter().cloned().map(Task::from).collect()
}

/// Repository interface for task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn get_all_tasks(&self) -> RepoResult<TaskStream>;
    async fn get_task_by_id(&self, id: TaskId) -> RepoResult<Option<Task>>;
    async fn upsert_task(&self, task: &Task) -> RepoResult<TaskId>;
    async fn delete_task(&self, task: &Task) -> RepoResult<()>;
}

/// Repository over any `TaskStore`.
pub struct StoreTaskRepository {
    store: Arc<dyn TaskStore>,
}

impl StoreTaskRepository {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskRepository for StoreTaskRepository {
    async fn get_all_tasks(&self) -> RepoResult<TaskStream> {
        let records = self.store.list().await?;
        Ok(TaskStream { records })
    }

    async fn get_task_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        Ok(self.store.get_by_id(id).await?.map(Task::from))
    }

    async fn upsert_task(&self, task: &Task) -> RepoResult<TaskId> {
        Ok(self.store.upsert(&TaskRecord::from(task)).await?)
    }

    async fn delete_task(&self, task: &Task) -> RepoResult<()> {
        Ok(self.store.delete(&TaskRecord::from(task)).await?)
    }
}
