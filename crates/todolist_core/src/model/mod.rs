//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical `Task` shape used by repository, use-cases and
//!   view-states.
//! - Define the visibility filter applied to live task snapshots.
//!
//! # Invariants
//! - `id == UNSET_TASK_ID` means the task has never been persisted.
//! - Listing order is `timestamp DESC`, ties broken by `id DESC`.

pub mod filter;
pub mod task;
