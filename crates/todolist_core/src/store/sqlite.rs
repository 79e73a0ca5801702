//! SQLite-backed task store.
//!
//! # Responsibility
//! - Map `TaskStore` operations onto the `tasks` table.
//! - Publish a fresh snapshot after every committed mutation.
//! - Report a mutation by its own outcome; a snapshot read that fails
//!   afterwards is logged, not returned.
//!
//! # Invariants
//! - The connection is only touched while holding `conn`; publication uses
//!   the same guard.
//! - `AUTOINCREMENT` keeps deleted ids from being reassigned, so an undo
//!   restoring an old id can never collide with a newer task.

use super::live::{LiveQuery, SnapshotPublisher};
use super::{StoreError, StoreResult, TaskRecord, TaskStore};
use crate::db::{open_db, open_db_in_memory};
use crate::model::task::{TaskId, UNSET_TASK_ID};
use async_trait::async_trait;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::Mutex;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    is_completed,
    timestamp
FROM tasks";

/// Task store over one SQLite connection.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
    publisher: SnapshotPublisher<TaskRecord>,
}

impl SqliteTaskStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            publisher: SnapshotPublisher::new(),
        }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Pushes the current table to subscribers. A failed read is logged and
    /// skipped: the write it follows has already been committed.
    fn publish_snapshot(&self, conn: &Connection) {
        if !self.publisher.has_subscribers() {
            return;
        }
        match select_all(conn) {
            Ok(snapshot) => {
                debug!(
                    "event=task_snapshot module=store status=published rows={}",
                    snapshot.len()
                );
                self.publisher.publish(snapshot);
            }
            Err(err) => {
                error!("event=task_snapshot module=store status=error error={err}");
            }
        }
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn upsert(&self, record: &TaskRecord) -> StoreResult<TaskId> {
        let conn = self.conn.lock().await;
        let id = match upsert_row(&conn, record) {
            Ok(id) => id,
            Err(err) => {
                error!(
                    "event=task_upsert module=store status=error task_id={} error={}",
                    record.id, err
                );
                return Err(err);
            }
        };
        debug!(
            "event=task_upsert module=store status=ok task_id={id} mode={}",
            if record.id == UNSET_TASK_ID {
                "insert"
            } else {
                "replace"
            }
        );
        self.publish_snapshot(&conn);
        Ok(id)
    }

    async fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>> {
        let conn = self.conn.lock().await;
        select_one(&conn, id)
    }

    async fn delete(&self, record: &TaskRecord) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1;", [record.id])?;
        debug!(
            "event=task_delete module=store status=ok task_id={} changed={changed}",
            record.id
        );
        self.publish_snapshot(&conn);
        Ok(())
    }

    async fn list(&self) -> StoreResult<LiveQuery<TaskRecord>> {
        let conn = self.conn.lock().await;
        let current = select_all(&conn)?;
        Ok(self.publisher.subscribe(current))
    }
}

fn upsert_row(conn: &Connection, record: &TaskRecord) -> StoreResult<TaskId> {
    conn.execute(
        "INSERT OR REPLACE INTO tasks (
            id,
            title,
            description,
            is_completed,
            timestamp
        ) VALUES (NULLIF(?1, 0), ?2, ?3, ?4, ?5);",
        params![
            record.id,
            record.title.as_str(),
            record.description.as_deref(),
            bool_to_int(record.is_completed),
            record.timestamp,
        ],
    )?;

    if record.id == UNSET_TASK_ID {
        Ok(conn.last_insert_rowid())
    } else {
        Ok(record.id)
    }
}

fn select_one(conn: &Connection, id: TaskId) -> StoreResult<Option<TaskRecord>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_task_row(row)))
        .optional()?;
    row.transpose()
}

fn select_all(conn: &Connection) -> StoreResult<Vec<TaskRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{TASK_SELECT_SQL} ORDER BY timestamp DESC, id DESC;"
    ))?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        records.push(parse_task_row(row)?);
    }

    Ok(records)
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<TaskRecord> {
    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid is_completed value `{other}` in tasks.is_completed"
            )));
        }
    };

    Ok(TaskRecord {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        is_completed,
        timestamp: row.get("timestamp")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
