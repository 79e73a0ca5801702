//! List screen view-state.
//!
//! # Responsibility
//! - Hold the visibility filter and combine it with the live task list.
//! - Remember the most recently deleted task for a single-step undo.
//! - Emit navigation and snackbar events.
//!
//! # Invariants
//! - Only one deleted task is remembered; a second delete before undo makes
//!   the first one unrecoverable through undo.
//! - Undo re-saves the remembered task unchanged (same id), then clears the
//!   slot whether or not anything was remembered.
//! - Toggling completion keeps the task's timestamp, so the list order does
//!   not change.

use crate::model::filter::TaskFilter;
use crate::model::task::Task;
use crate::repo::task_repo::{RepoResult, TaskStream};
use crate::service::task_usecases::TaskUseCases;
use crate::ui::event::{
    ui_event_channel, UiEvent, UiEventReceiver, UiEventSender, TASK_DELETED_MESSAGE,
    UNDO_ACTION_LABEL,
};
use crate::ui::navigation::Route;
use crate::ui::ViewStateError;
use log::{debug, info};
use tokio::sync::watch;

/// Commands accepted by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListEvent {
    DeleteTaskClick(Task),
    DoneTaskClick(Task, bool),
    TaskClick(Task),
    AddTaskClick,
    UndoDeleteClick,
    FilterSelected(TaskFilter),
}

/// Snapshot of the list screen's own state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    pub filter: TaskFilter,
    pub last_deleted: Option<Task>,
}

/// State holder for the task list screen.
pub struct TaskListViewState {
    use_cases: TaskUseCases,
    filter: watch::Sender<TaskFilter>,
    last_deleted: Option<Task>,
    events: UiEventSender,
    event_rx: Option<UiEventReceiver>,
}

impl TaskListViewState {
    pub fn new(use_cases: TaskUseCases) -> Self {
        let (filter, _) = watch::channel(TaskFilter::default());
        let (events, event_rx) = ui_event_channel("task_list");
        Self {
            use_cases,
            filter,
            last_deleted: None,
            events,
            event_rx: Some(event_rx),
        }
    }

    pub fn state(&self) -> TaskListState {
        TaskListState {
            filter: self.filter(),
            last_deleted: self.last_deleted.clone(),
        }
    }

    pub fn filter(&self) -> TaskFilter {
        *self.filter.borrow()
    }

    pub fn last_deleted(&self) -> Option<&Task> {
        self.last_deleted.as_ref()
    }

    /// Hands out the one-shot event receiver. Returns `None` after the first
    /// call: the channel has a single consumer.
    pub fn take_ui_events(&mut self) -> Option<UiEventReceiver> {
        self.event_rx.take()
    }

    /// Opens the filtered, live task list.
    pub async fn filtered_tasks(&self) -> RepoResult<FilteredTasks> {
        let tasks = self.use_cases.get_tasks.invoke().await?;
        Ok(FilteredTasks {
            tasks,
            filter: self.filter.subscribe(),
            latest: None,
        })
    }

    /// Applies one user command.
    ///
    /// Storage failures propagate; state changed before the failing call
    /// (such as the remembered deleted task) is kept.
    pub async fn on_event(&mut self, event: TaskListEvent) -> Result<(), ViewStateError> {
        match event {
            TaskListEvent::DeleteTaskClick(task) => {
                self.last_deleted = Some(task.clone());
                self.use_cases.delete_task.invoke(&task).await?;
                info!(
                    "event=task_delete module=ui status=ok task_id={} undo=available",
                    task.id
                );
                self.events.send(UiEvent::snackbar(
                    TASK_DELETED_MESSAGE,
                    Some(UNDO_ACTION_LABEL),
                ));
            }
            TaskListEvent::DoneTaskClick(task, is_done) => {
                self.use_cases
                    .upsert_task
                    .invoke(&task.with_completed(is_done))
                    .await?;
                debug!(
                    "event=task_toggle module=ui status=ok task_id={} done={is_done}",
                    task.id
                );
            }
            TaskListEvent::TaskClick(task) => {
                self.events
                    .send(UiEvent::Navigate(Route::add_edit_task(Some(task.id))));
            }
            TaskListEvent::AddTaskClick => {
                self.events.send(UiEvent::Navigate(Route::add_edit_task(None)));
            }
            TaskListEvent::UndoDeleteClick => {
                if let Some(task) = self.last_deleted.take() {
                    self.use_cases.upsert_task.invoke(&task).await?;
                    info!(
                        "event=task_undo_delete module=ui status=ok task_id={}",
                        task.id
                    );
                } else {
                    debug!(
                        "event=task_undo_delete module=ui status=skipped reason=nothing_deleted"
                    );
                }
            }
            TaskListEvent::FilterSelected(filter) => {
                self.filter.send_replace(filter);
                debug!("event=task_filter module=ui status=ok filter={filter}");
            }
        }
        Ok(())
    }
}

/// Live task list filtered by the view-state's current filter.
///
/// Re-emits whenever either the stored tasks or the filter change. Ends when
/// the store or the owning view-state is dropped.
pub struct FilteredTasks {
    tasks: TaskStream,
    filter: watch::Receiver<TaskFilter>,
    latest: Option<Vec<Task>>,
}

enum Change {
    Tasks(Option<Vec<Task>>),
    Filter(bool),
}

impl FilteredTasks {
    /// Waits for the next filtered snapshot.
    pub async fn next(&mut self) -> Option<Vec<Task>> {
        if self.latest.is_none() {
            let snapshot = self.tasks.next().await?;
            let _ = self.filter.borrow_and_update();
            self.latest = Some(snapshot);
            return Some(self.current());
        }

        let change = tokio::select! {
            snapshot = self.tasks.next() => Change::Tasks(snapshot),
            changed = self.filter.changed() => Change::Filter(changed.is_ok()),
        };

        match change {
            Change::Tasks(Some(snapshot)) => self.latest = Some(snapshot),
            Change::Tasks(None) | Change::Filter(false) => return None,
            Change::Filter(true) => {}
        }
        Some(self.current())
    }

    /// Applies any already delivered changes without waiting and returns
    /// the resulting filtered snapshot, if one exists yet.
    pub fn current_snapshot(&mut self) -> Option<Vec<Task>> {
        if let Some(snapshot) = self.tasks.try_latest() {
            self.latest = Some(snapshot);
        }
        let _ = self.filter.borrow_and_update();
        self.latest.as_ref().map(|_| self.current())
    }

    fn current(&self) -> Vec<Task> {
        let filter = *self.filter.borrow();
        self.latest
            .as_deref()
            .map(|tasks| filter.apply(tasks))
            .unwrap_or_default()
    }
}
