//! tasklist - an in-memory task list
//!
//! Tasks carry a priority and an optional deadline, move between a pending
//! and a completed list, and can be filtered by priority and sorted by
//! deadline. Deadline urgency and completion progress are derived fresh
//! from the store every time the view is rebuilt. Nothing is persisted.

pub mod cli;
pub mod config;
pub mod controller;
pub mod domain;
pub mod view;

pub use controller::{Action, Controller, Dispatch};
pub use domain::{Priority, Task, TaskId, TaskStore, Urgency};
pub use view::{BoardView, Filter};
