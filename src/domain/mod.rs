//! Domain models for tasklist
//!
//! Contains the task model and the pure computations over it, without any
//! I/O concerns.

mod clock;
mod deadline;
mod id;
mod progress;
mod store;
mod task;

pub use clock::{Clock, FixedClock, SystemClock};
pub use deadline::{DeadlineClassifier, ThresholdError, Urgency, DEFAULT_CLOSE_THRESHOLD_DAYS};
pub use id::{IdError, TaskId};
pub use progress::progress;
pub use store::{Section, StoreError, TaskStore};
pub use task::{parse_deadline, ParseError, Priority, Task, ValidationError, DEADLINE_FORMAT};
