//! Controller: dispatches user actions into the store
//!
//! The controller owns the [`TaskStore`], the active [`Filter`], the deadline
//! classifier and the clock. Display surfaces turn their own input events into
//! an [`Action`], call [`Controller::dispatch`], then redraw from
//! [`Controller::view`]. The view is always rebuilt against a fresh reading of
//! the clock.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{
    parse_deadline, Clock, DeadlineClassifier, ParseError, Priority, Section, StoreError,
    SystemClock, TaskId, TaskStore, ValidationError,
};
use crate::view::{BoardView, Filter};

#[derive(Debug, Error, PartialEq)]
pub enum ControllerError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything a user can do to the task list
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Add {
        text: String,
        priority: Priority,
        deadline: Option<NaiveDate>,
    },
    Complete(TaskId),
    Reopen(TaskId),
    /// Checkbox semantics: complete if pending, reopen if completed
    Toggle(TaskId),
    Delete(TaskId),
    SetFilter(Filter),
    Sort,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Add { .. } => "add",
            Action::Complete(_) => "complete",
            Action::Reopen(_) => "reopen",
            Action::Toggle(_) => "toggle",
            Action::Delete(_) => "delete",
            Action::SetFilter(_) => "filter",
            Action::Sort => "sort",
        }
    }
}

/// What a dispatched action did
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Added(TaskId),
    Completed(TaskId),
    Reopened(TaskId),
    Deleted(TaskId),
    FilterChanged(Filter),
    Sorted,
    /// Add with blank text; nothing changed
    Ignored,
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Added(id) => write!(f, "added {}", id),
            Dispatch::Completed(id) => write!(f, "completed {}", id),
            Dispatch::Reopened(id) => write!(f, "reopened {}", id),
            Dispatch::Deleted(id) => write!(f, "deleted {}", id),
            Dispatch::FilterChanged(filter) => write!(f, "filter set to {}", filter),
            Dispatch::Sorted => f.write_str("sorted by deadline"),
            Dispatch::Ignored => f.write_str("ignored empty task"),
        }
    }
}

/// Owns task list state and applies actions to it
pub struct Controller {
    store: TaskStore,
    filter: Filter,
    classifier: DeadlineClassifier,
    clock: Box<dyn Clock>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(DeadlineClassifier::default(), Box::new(SystemClock))
    }
}

impl Controller {
    pub fn new(classifier: DeadlineClassifier, clock: Box<dyn Clock>) -> Self {
        Self {
            store: TaskStore::new(),
            filter: Filter::All,
            classifier,
            clock,
        }
    }

    /// Applies one action
    pub fn dispatch(&mut self, action: Action) -> Result<Dispatch, ControllerError> {
        let outcome = match action {
            Action::Add {
                text,
                priority,
                deadline,
            } => {
                let now = self.clock.now();
                match self.store.add(&text, priority, deadline, now) {
                    Ok(task) => Dispatch::Added(task.id.clone()),
                    Err(StoreError::Validation(ValidationError::EmptyText)) => Dispatch::Ignored,
                    Err(e) => return Err(e.into()),
                }
            }
            Action::Complete(id) => {
                self.store.complete(&id)?;
                Dispatch::Completed(id)
            }
            Action::Reopen(id) => {
                self.store.reopen(&id)?;
                Dispatch::Reopened(id)
            }
            Action::Toggle(id) => match self.store.locate(&id) {
                Some((Section::Pending, _)) => {
                    self.store.complete(&id)?;
                    Dispatch::Completed(id)
                }
                Some((Section::Completed, _)) => {
                    self.store.reopen(&id)?;
                    Dispatch::Reopened(id)
                }
                None => return Err(StoreError::NotFound(id).into()),
            },
            Action::Delete(id) => {
                self.store.remove(&id)?;
                Dispatch::Deleted(id)
            }
            Action::SetFilter(filter) => {
                self.set_filter(filter);
                Dispatch::FilterChanged(filter)
            }
            Action::Sort => {
                self.store.sort_pending_by_deadline();
                Dispatch::Sorted
            }
        };

        Ok(outcome)
    }

    /// Rebuilds the view against the current time
    pub fn view(&self) -> BoardView {
        BoardView::render(&self.store, self.filter, &self.classifier, self.clock.now())
    }

    /// Resolves a task reference: an ID, or else an exact label looked up in
    /// `prefer` before the other section
    pub fn resolve(&self, reference: &str, prefer: Section) -> Option<TaskId> {
        if let Ok(id) = reference.trim().parse::<TaskId>() {
            if self.store.get(&id).is_some() {
                return Some(id);
            }
        }
        self.store
            .find_by_label_in(reference, prefer)
            .map(|t| t.id.clone())
    }

    /// Sets the active filter directly
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

}

/// Field being edited in an [`InputForm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Text,
    Priority,
    Deadline,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Text => FormField::Priority,
            FormField::Priority => FormField::Deadline,
            FormField::Deadline => FormField::Text,
        }
    }
}

/// The add-task input fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputForm {
    pub text: String,
    pub priority: Priority,
    pub deadline: String,
    pub field: FormField,
}

impl InputForm {
    pub fn new(default_priority: Priority) -> Self {
        Self {
            priority: default_priority,
            ..Self::default()
        }
    }

    /// Builds an add action from the current fields
    pub fn to_action(&self) -> Result<Action, ParseError> {
        Ok(Action::Add {
            text: self.text.clone(),
            priority: self.priority,
            deadline: parse_deadline(&self.deadline)?,
        })
    }

    /// Clears text and deadline, restores the default priority
    pub fn reset(&mut self, default_priority: Priority) {
        *self = Self::new(default_priority);
    }

    pub fn push_char(&mut self, c: char) {
        match self.field {
            FormField::Text => self.text.push(c),
            FormField::Deadline => self.deadline.push(c),
            FormField::Priority => {
                if let Ok(p) = c.to_string().parse() {
                    self.priority = p;
                }
            }
        }
    }

    pub fn pop_char(&mut self) {
        match self.field {
            FormField::Text => {
                self.text.pop();
            }
            FormField::Deadline => {
                self.deadline.pop();
            }
            FormField::Priority => {}
        }
    }
}
