//! Durable task table and its live query.
//!
//! # Responsibility
//! - Own the durable copy of every task record.
//! - Assign ids on first insert and fully overwrite on later upserts.
//! - Push a full, ordered snapshot to every live subscriber after each
//!   mutation.
//!
//! # Invariants
//! - Writes are serialized; snapshot publication happens inside the same
//!   critical section as the write, so subscribers observe mutations in order.
//! - Snapshots are ordered by `timestamp DESC, id DESC`.
//! - Deleting an absent id succeeds without publishing a spurious error.

use crate::db::DbError;
use crate::model::task::TaskId;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod live;
mod memory;
mod sqlite;

pub use live::LiveQuery;
pub use memory::InMemoryTaskStore;
pub use sqlite::SqliteTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure. Never retried by callers.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row shape of the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub timestamp: i64,
}

/// Storage contract for task records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts (`id == 0`) or fully replaces the record, returning its id.
    async fn upsert(&self, record: &TaskRecord) -> StoreResult<TaskId>;
    /// Reads one record by id.
    async fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>>;
    /// Removes the record with `record.id`; absent ids are a no-op.
    async fn delete(&self, record: &TaskRecord) -> StoreResult<()>;
    /// Opens a live query over all records, newest first.
    async fn list(&self) -> StoreResult<LiveQuery<TaskRecord>>;
}

/// Listing order shared by every store implementation.
pub(crate) fn sort_snapshot(records: &mut [TaskRecord]) {
    records.sort_by(|left, right| {
        right
            .timestamp
            .cmp(&left.timestamp)
            .then_with(|| right.id.cmp(&left.id))
    });
}
