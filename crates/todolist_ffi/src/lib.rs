//! Flutter bridge for the task core.
//!
//! `api` holds every Dart-visible function; bindings are generated from it.

pub mod api;
