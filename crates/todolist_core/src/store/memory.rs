//! In-memory task store with the same contract as the SQLite store.
//!
//! Used where a durable file is not wanted: tests that check the repository
//! is a transparent pass-through, and throwaway sessions.

use super::live::{LiveQuery, SnapshotPublisher};
use super::{sort_snapshot, StoreResult, TaskRecord, TaskStore};
use crate::model::task::{TaskId, UNSET_TASK_ID};
use async_trait::async_trait;
use log::debug;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug)]
struct MemoryTable {
    next_id: TaskId,
    rows: BTreeMap<TaskId, TaskRecord>,
}

impl MemoryTable {
    fn snapshot(&self) -> Vec<TaskRecord> {
        let mut records = self.rows.values().cloned().collect::<Vec<_>>();
        sort_snapshot(&mut records);
        records
    }
}

/// `BTreeMap`-backed task store.
#[derive(Debug)]
pub struct InMemoryTaskStore {
    table: Mutex<MemoryTable>,
    publisher: SnapshotPublisher<TaskRecord>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(MemoryTable {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
            publisher: SnapshotPublisher::new(),
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn upsert(&self, record: &TaskRecord) -> StoreResult<TaskId> {
        let mut table = self.table.lock().await;
        let id = if record.id == UNSET_TASK_ID {
            let id = table.next_id;
            table.next_id += 1;
            id
        } else {
            // Explicit ids never get handed out again for new rows.
            table.next_id = table.next_id.max(record.id.saturating_add(1));
            record.id
        };

        table.rows.insert(
            id,
            TaskRecord {
                id,
                ..record.clone()
            },
        );
        debug!("event=task_upsert module=store status=ok backend=memory task_id={id}");
        if self.publisher.has_subscribers() {
            self.publisher.publish(table.snapshot());
        }
        Ok(id)
    }

    async fn get_by_id(&self, id: TaskId) -> StoreResult<Option<TaskRecord>> {
        let table = self.table.lock().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn delete(&self, record: &TaskRecord) -> StoreResult<()> {
        let mut table = self.table.lock().await;
        let removed = table.rows.remove(&record.id).is_some();
        debug!(
            "event=task_delete module=store status=ok backend=memory task_id={} removed={removed}",
            record.id
        );
        if self.publisher.has_subscribers() {
            self.publisher.publish(table.snapshot());
        }
        Ok(())
    }

    async fn list(&self) -> StoreResult<LiveQuery<TaskRecord>> {
        let table = self.table.lock().await;
        Ok(self.publisher.subscribe(table.snapshot()))
    }
}
