//! Add/edit screen view-state.
//!
//! # Responsibility
//! - Hold in-progress edit fields for one task, seeded from storage or blank.
//! - Validate and save on submit, then ask the screen to close.
//!
//! # Invariants
//! - A blank or whitespace-only title never reaches the store.
//! - Field edits are not validated and are never written back implicitly.

use crate::model::task::{
    normalize_description, now_epoch_ms, validate_title, Task, TaskId, UNSET_TASK_ID,
};
use crate::service::task_usecases::TaskUseCases;
use crate::ui::event::{
    ui_event_channel, UiEvent, UiEventReceiver, UiEventSender, BLANK_TITLE_MESSAGE,
};
use crate::ui::navigation::Route;
use crate::ui::ViewStateError;
use log::{debug, info};

/// Commands accepted by the edit screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddEditTaskEvent {
    TitleChanged(String),
    DescriptionChanged(String),
    DoneChanged(bool),
    SaveTaskClick,
}

/// In-progress edit fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTaskState {
    /// Id of the task being edited; `None` while creating.
    pub task_id: Option<TaskId>,
    pub title: String,
    /// Empty string stands for "no description".
    pub description: String,
    pub is_completed: bool,
}

impl EditTaskState {
    fn from_task(task: Task) -> Self {
        Self {
            task_id: Some(task.id),
            title: task.title,
            description: task.description.unwrap_or_default(),
            is_completed: task.is_completed,
        }
    }

    /// Builds the task to persist, stamped with `timestamp`.
    fn to_task(&self, timestamp: i64) -> Task {
        Task {
            id: self.task_id.unwrap_or(UNSET_TASK_ID),
            title: self.title.clone(),
            description: normalize_description(Some(self.description.clone())),
            is_completed: self.is_completed,
            timestamp,
        }
    }
}

/// State holder for the add/edit screen.
pub struct EditTaskViewState {
    use_cases: TaskUseCases,
    state: EditTaskState,
    events: UiEventSender,
    event_rx: Option<UiEventReceiver>,
}

impl EditTaskViewState {
    /// Seeds the fields from `task_id`, or leaves them blank.
    ///
    /// A missing task is not an error: the form stays blank and a save
    /// creates a new task.
    pub async fn load(
        use_cases: TaskUseCases,
        task_id: Option<TaskId>,
    ) -> Result<Self, ViewStateError> {
        let state = match task_id {
            Some(id) => match use_cases.get_task_by_id.invoke(id).await? {
                Some(task) => EditTaskState::from_task(task),
                None => {
                    debug!("event=task_edit_load module=ui status=not_found task_id={id}");
                    EditTaskState::default()
                }
            },
            None => EditTaskState::default(),
        };

        let (events, event_rx) = ui_event_channel("edit_task");
        Ok(Self {
            use_cases,
            state,
            events,
            event_rx: Some(event_rx),
        })
    }

    /// Seeds the fields from the id carried by `route`.
    pub async fn from_route(
        use_cases: TaskUseCases,
        route: &Route,
    ) -> Result<Self, ViewStateError> {
        Self::load(use_cases, route.task_id()).await
    }

    pub fn state(&self) -> &EditTaskState {
        &self.state
    }

    /// Hands out the one-shot event receiver. Returns `None` after the first
    /// call.
    pub fn take_ui_events(&mut self) -> Option<UiEventReceiver> {
        self.event_rx.take()
    }

    /// Applies one user command.
    pub async fn on_event(&mut self, event: AddEditTaskEvent) -> Result<(), ViewStateError> {
        match event {
            AddEditTaskEvent::TitleChanged(title) => self.state.title = title,
            AddEditTaskEvent::DescriptionChanged(description) => {
                self.state.description = description;
            }
            AddEditTaskEvent::DoneChanged(is_done) => self.state.is_completed = is_done,
            AddEditTaskEvent::SaveTaskClick => self.save().await?,
        }
        Ok(())
    }

    async fn save(&mut self) -> Result<(), ViewStateError> {
        if validate_title(&self.state.title).is_err() {
            debug!("event=task_save module=ui status=rejected reason=blank_title");
            self.events.send(UiEvent::snackbar(BLANK_TITLE_MESSAGE, None));
            return Ok(());
        }

        let task = self.state.to_task(now_epoch_ms());
        let id = self.use_cases.upsert_task.invoke(&task).await?;
        info!(
            "event=task_save module=ui status=ok task_id={id} mode={}",
            if self.state.task_id.is_some() {
                "update"
            } else {
                "create"
            }
        );
        // A second save from the same form must update, not duplicate.
        self.state.task_id = Some(id);
        self.events.send(UiEvent::PopBackStack);
        Ok(())
    }
}
