//! Presentation state holders.
//!
//! # Responsibility
//! - Model each screen as an explicit state object plus a reducer
//!   (`on_event`), testable without any rendering environment.
//! - Deliver navigation and transient messages through a per-view-state,
//!   single-consumer event channel.
//!
//! # Invariants
//! - View-states never write to storage except through a use-case call
//!   triggered by an explicit command.
//! - One-shot events keep emission order and are never dropped while the
//!   consumer is alive.

use crate::repo::task_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod edit_task;
pub mod event;
pub mod navigation;
pub mod task_list;

/// Failure surfaced by a view-state command.
#[derive(Debug)]
pub enum ViewStateError {
    /// Storage failure bubbled up from a use-case.
    Repo(RepoError),
}

impl Display for ViewStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ViewStateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ViewStateError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
