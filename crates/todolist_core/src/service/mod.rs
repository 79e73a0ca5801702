//! Use-case layer.
//!
//! # Responsibility
//! - Give view-states a narrow, named dependency surface instead of the full
//!   repository.
//! - Delegate every call to the repository unchanged.

pub mod task_usecases;
