//! Repository layer between the task store and the use-cases.
//!
//! # Responsibility
//! - Translate storage records into domain tasks and back.
//! - Stay a transparent pass-through: no caching, no validation.
//!
//! # Invariants
//! - For any store `S`, repository behavior equals `S` behavior modulo the
//!   record/task conversion.

pub mod task_repo;
