//! # View
//!
//! Projects the task store onto what a display surface shows: the filtered
//! pending list, the completed list, urgency decorations and the progress
//! percentage. Views are rebuilt from scratch on every recompute and never
//! write back into the store.

mod board;
mod filter;

pub use board::{BoardView, TaskItem};
pub use filter::Filter;
