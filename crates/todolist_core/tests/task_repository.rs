use std::sync::Arc;
use todolist_core::{
    InMemoryTaskStore, SqliteTaskStore, StoreTaskRepository, Task, TaskRecord, TaskRepository,
    TaskStore,
};

async fn apply_script(repo: &dyn TaskRepository) -> (Vec<Task>, Option<Task>, Option<Task>) {
    let buy = repo
        .upsert_task(&Task::new("Buy milk", None, false, 100))
        .await
        .unwrap();
    let call = repo
        .upsert_task(&Task::new("Call mom", Some("evening".to_string()), false, 200))
        .await
        .unwrap();

    let mut bought = repo.get_task_by_id(buy).await.unwrap().unwrap();
    bought.is_completed = true;
    repo.upsert_task(&bought).await.unwrap();

    let called = repo.get_task_by_id(call).await.unwrap().unwrap();
    repo.delete_task(&called).await.unwrap();

    let mut stream = repo.get_all_tasks().await.unwrap();
    let snapshot = stream.next().await.unwrap();
    (
        snapshot,
        repo.get_task_by_id(buy).await.unwrap(),
        repo.get_task_by_id(call).await.unwrap(),
    )
}

#[tokio::test]
async fn repository_behaves_identically_over_memory_and_sqlite_stores() {
    let memory = StoreTaskRepository::new(Arc::new(InMemoryTaskStore::new()));
    let sqlite = StoreTaskRepository::new(Arc::new(SqliteTaskStore::open_in_memory().unwrap()));

    let from_memory = apply_script(&memory).await;
    let from_sqlite = apply_script(&sqlite).await;

    assert_eq!(from_memory, from_sqlite);
    assert_eq!(from_memory.0.len(), 1);
    assert!(from_memory.0[0].is_completed);
    assert!(from_memory.2.is_none());
}

#[tokio::test]
async fn repository_translates_records_without_altering_fields() {
    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    let repo = StoreTaskRepository::new(Arc::clone(&store));

    let record = TaskRecord {
        id: 0,
        title: "raw".to_string(),
        description: Some("kept".to_string()),
        is_completed: true,
        timestamp: 77,
    };
    let id = store.upsert(&record).await.unwrap();

    let task = repo.get_task_by_id(id).await.unwrap().unwrap();
    assert_eq!(TaskRecord::from(&task), TaskRecord { id, ..record });
}

#[tokio::test]
async fn task_stream_follows_store_mutations() {
    let repo = StoreTaskRepository::new(Arc::new(InMemoryTaskStore::new()));
    let mut stream = repo.get_all_tasks().await.unwrap();
    assert!(stream.next().await.unwrap().is_empty());

    let id = repo
        .upsert_task(&Task::new("new", None, false, 1))
        .await
        .unwrap();
    let snapshot = stream.next().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, id);
}
