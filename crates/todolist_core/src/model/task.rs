//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted entity of the application.
//! - Provide normalization helpers shared by edit and list flows.
//!
//! # Invariants
//! - `id` is assigned by the store; callers only ever pass `UNSET_TASK_ID`
//!   or an id previously returned by the store.
//! - `description` is never `Some("")` or whitespace-only after `Task::new`.
//! - `timestamp` is Unix epoch milliseconds chosen by the writer.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned task identifier.
pub type TaskId = i64;

/// Sentinel id for tasks that have not been persisted yet.
pub const UNSET_TASK_ID: TaskId = 0;

/// Validation failures raised by the edit flow before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title cannot be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// A short text task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned id, `UNSET_TASK_ID` before first save.
    #[serde(default)]
    pub id: TaskId,
    /// Display title. Non-blank for every persisted task.
    pub title: String,
    /// Optional free text; blank input is stored as `None`.
    pub description: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub is_completed: bool,
    /// Unix epoch milliseconds of the last save. Sort key for listing.
    pub timestamp: i64,
}

impl Task {
    /// Creates an unsaved task. The store assigns the id on first upsert.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        is_completed: bool,
        timestamp: i64,
    ) -> Self {
        Self {
            id: UNSET_TASK_ID,
            title: title.into(),
            description: normalize_description(description),
            is_completed,
            timestamp,
        }
    }

    /// Returns whether the store has assigned an id to this task.
    pub fn is_persisted(&self) -> bool {
        self.id != UNSET_TASK_ID
    }

    /// Returns a copy with the completion flag replaced.
    ///
    /// `timestamp` is kept as-is so toggling never reorders the list.
    pub fn with_completed(&self, is_completed: bool) -> Self {
        Self {
            is_completed,
            ..self.clone()
        }
    }
}

/// Maps blank descriptions to `None`, keeping non-blank text untouched.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|value| !value.trim().is_empty())
}

/// Rejects empty and whitespace-only titles.
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    Ok(())
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before 1970 collapse to `0` instead of failing the save.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{normalize_description, now_epoch_ms, validate_title, Task, TaskValidationError};

    #[test]
    fn new_task_is_unsaved_and_normalizes_description() {
        let task = Task::new("Buy milk", Some("   ".to_string()), false, 10);
        assert!(!task.is_persisted());
        assert_eq!(task.description, None);
    }

    #[test]
    fn with_completed_keeps_timestamp() {
        let mut task = Task::new("Ship", None, false, 42);
        task.id = 7;
        let done = task.with_completed(true);
        assert!(done.is_completed);
        assert_eq!(done.timestamp, 42);
        assert_eq!(done.id, 7);
    }

    #[test]
    fn normalize_description_keeps_text() {
        assert_eq!(
            normalize_description(Some(" note ".to_string())).as_deref(),
            Some(" note ")
        );
        assert_eq!(normalize_description(None), None);
    }

    #[test]
    fn validate_title_rejects_whitespace() {
        assert_eq!(validate_title(" \t\n"), Err(TaskValidationError::BlankTitle));
        assert!(validate_title("x").is_ok());
    }

    #[test]
    fn now_is_after_2020() {
        assert!(now_epoch_ms() > 1_577_836_800_000);
    }
}
