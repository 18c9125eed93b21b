//! In-memory task store
//!
//! Holds two ordered sequences, pending and completed. A task lives in
//! exactly one of them from creation until it is removed. All mutation of
//! task state goes through [`TaskStore`].

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use super::id::TaskId;
use super::task::{Priority, Task, ValidationError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    #[error("Task {0} is not pending")]
    NotPending(TaskId),

    #[error("Task {0} is not completed")]
    NotCompleted(TaskId),
}

/// Which sequence a task currently sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Pending,
    Completed,
}

/// Pending and completed task sequences
#[derive(Debug, Default)]
pub struct TaskStore {
    pending: Vec<Task>,
    completed: Vec<Task>,
    /// Monotonic creation counter, feeds ID generation
    next_seq: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new pending task
    pub fn add(
        &mut self,
        text: &str,
        priority: Priority,
        deadline: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<&Task, StoreError> {
        let id = self.fresh_id(text.trim(), now);
        let task = Task::new(id, text, priority, deadline, now)?;
        self.next_seq += 1;
        self.pending.push(task);
        Ok(&self.pending[self.pending.len() - 1])
    }

    /// Moves a pending task to the end of the completed sequence
    pub fn complete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let index = match self.locate(id) {
            Some((Section::Pending, index)) => index,
            Some((Section::Completed, _)) => return Err(StoreError::NotPending(id.clone())),
            None => return Err(StoreError::NotFound(id.clone())),
        };

        let mut task = self.pending.remove(index);
        task.completed = true;
        self.completed.push(task);
        Ok(())
    }

    /// Moves a completed task back to the end of the pending sequence
    pub fn reopen(&mut self, id: &TaskId) -> Result<(), StoreError> {
        let index = match self.locate(id) {
            Some((Section::Completed, index)) => index,
            Some((Section::Pending, _)) => return Err(StoreError::NotCompleted(id.clone())),
            None => return Err(StoreError::NotFound(id.clone())),
        };

        let mut task = self.completed.remove(index);
        task.completed = false;
        self.pending.push(task);
        Ok(())
    }

    /// Deletes a task from whichever sequence holds it
    pub fn remove(&mut self, id: &TaskId) -> Result<Task, StoreError> {
        match self.locate(id) {
            Some((Section::Pending, index)) => Ok(self.pending.remove(index)),
            Some((Section::Completed, index)) => Ok(self.completed.remove(index)),
            None => Err(StoreError::NotFound(id.clone())),
        }
    }

    /// Stable sort of the pending sequence: dated tasks ascending, undated last
    pub fn sort_pending_by_deadline(&mut self) {
        self.pending.sort_by(|a, b| compare_deadlines(a.deadline, b.deadline));
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.pending
            .iter()
            .chain(self.completed.iter())
            .find(|t| &t.id == id)
    }

    /// Returns which sequence holds the task and its index there
    pub fn locate(&self, id: &TaskId) -> Option<(Section, usize)> {
        if let Some(i) = self.pending.iter().position(|t| &t.id == id) {
            return Some((Section::Pending, i));
        }
        self.completed
            .iter()
            .position(|t| &t.id == id)
            .map(|i| (Section::Completed, i))
    }

    /// First task whose label matches exactly, pending tasks first
    pub fn find_by_label(&self, text: &str) -> Option<&Task> {
        self.find_by_label_in(text, Section::Pending)
    }

    /// First task whose label matches exactly, searching `first` before the
    /// other section
    pub fn find_by_label_in(&self, text: &str, first: Section) -> Option<&Task> {
        let text = text.trim();
        let (head, tail) = match first {
            Section::Pending => (&self.pending, &self.completed),
            Section::Completed => (&self.completed, &self.pending),
        };
        head.iter().chain(tail.iter()).find(|t| t.text == text)
    }

    pub fn pending(&self) -> &[Task] {
        &self.pending
    }

    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fresh_id(&self, text: &str, now: DateTime<Utc>) -> TaskId {
        let mut seq = self.next_seq;
        loop {
            let id = TaskId::new(text, now, seq);
            if self.locate(&id).is_none() {
                return id;
            }
            // 7 hex chars can collide; skip ahead
            seq += 1 << 32;
        }
    }
}

fn compare_deadlines(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn date(s: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    fn add(store: &mut TaskStore, text: &str, deadline: Option<NaiveDate>) -> TaskId {
        store
            .add(text, Priority::Medium, deadline, now())
            .unwrap()
            .id
            .clone()
    }

    fn labels(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn add_appends_pending() {
        let mut store = TaskStore::new();
        add(&mut store, "A", None);
        add(&mut store, "B", None);

        assert_eq!(labels(store.pending()), vec!["A", "B"]);
        assert_eq!(store.completed_count(), 0);
        assert!(store.pending().iter().all(|t| !t.completed));
    }

    #[test]
    fn add_rejects_blank_text() {
        let mut store = TaskStore::new();
        let err = store.add("   ", Priority::Low, None, now()).unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::EmptyText));
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_labels_get_distinct_ids() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "Same", None);
        let b = add(&mut store, "Same", None);
        assert_ne!(a, b);
    }

    #[test]
    fn complete_moves_to_completed() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A", None);
        add(&mut store, "B", None);

        store.complete(&a).unwrap();

        assert_eq!(labels(store.pending()), vec!["B"]);
        assert_eq!(labels(store.completed()), vec!["A"]);
        assert!(store.get(&a).unwrap().completed);
    }

    #[test]
    fn complete_twice_errors() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A", None);
        store.complete(&a).unwrap();
        assert_eq!(store.complete(&a), Err(StoreError::NotPending(a.clone())));
        assert_eq!(store.completed_count(), 1);
    }

    #[test]
    fn reopen_pending_errors() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A", None);
        assert_eq!(store.reopen(&a), Err(StoreError::NotCompleted(a.clone())));
    }

    #[test]
    fn reopen_appends_to_pending() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A", None);
        add(&mut store, "B", None);

        store.complete(&a).unwrap();
        store.reopen(&a).unwrap();

        assert_eq!(labels(store.pending()), vec!["B", "A"]);
        assert!(!store.get(&a).unwrap().completed);
    }

    #[test]
    fn remove_from_either_sequence() {
        let mut store = TaskStore::new();
        let a = add(&mut store, "A", None);
        let b = add(&mut store, "B", None);
        store.complete(&b).unwrap();

        assert_eq!(store.remove(&b).unwrap().text, "B");
        assert_eq!(store.completed_count(), 0);
        assert_eq!(store.pending_count(), 1);

        assert_eq!(store.remove(&a).unwrap().text, "A");
        assert!(store.is_empty());
        assert_eq!(store.remove(&a), Err(StoreError::NotFound(a.clone())));
    }

    #[test]
    fn sort_is_stable_with_undated_last() {
        let mut store = TaskStore::new();
        add(&mut store, "A", None);
        add(&mut store, "B", date("2024-01-01"));
        add(&mut store, "C", None);
        add(&mut store, "D", date("2024-01-02"));

        store.sort_pending_by_deadline();

        assert_eq!(labels(store.pending()), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn sort_keeps_insertion_order_on_ties() {
        let mut store = TaskStore::new();
        add(&mut store, "late", date("2024-03-01"));
        add(&mut store, "tie-1", date("2024-02-01"));
        add(&mut store, "tie-2", date("2024-02-01"));

        store.sort_pending_by_deadline();

        assert_eq!(labels(store.pending()), vec!["tie-1", "tie-2", "late"]);
    }

    #[test]
    fn sort_leaves_completed_alone() {
        let mut store = TaskStore::new();
        let late = add(&mut store, "late", date("2024-03-01"));
        let early = add(&mut store, "early", date("2024-01-01"));
        store.complete(&late).unwrap();
        store.complete(&early).unwrap();

        store.sort_pending_by_deadline();

        assert_eq!(labels(store.completed()), vec!["late", "early"]);
    }

    #[test]
    fn find_by_label_prefers_pending() {
        let mut store = TaskStore::new();
        let first = add(&mut store, "Same", None);
        let second = add(&mut store, "Same", None);
        store.complete(&first).unwrap();

        assert_eq!(store.find_by_label("Same").unwrap().id, second);
        assert!(store.find_by_label("Missing").is_none());
    }

    #[test]
    fn find_by_label_in_completed_first() {
        let mut store = TaskStore::new();
        let first = add(&mut store, "Same", None);
        let second = add(&mut store, "Same", None);
        store.complete(&first).unwrap();

        let found = store.find_by_label_in("Same", Section::Completed).unwrap();
        assert_eq!(found.id, first);
        let found = store.find_by_label_in("Same", Section::Pending).unwrap();
        assert_eq!(found.id, second);

        // Falls back to the other section
        store.remove(&second).unwrap();
        let found = store.find_by_label_in("Same", Section::Pending).unwrap();
        assert_eq!(found.id, first);
    }

    fn arb_deadline() -> impl Strategy<Value = Option<NaiveDate>> {
        proptest::option::of((0i64..60).prop_map(|d| {
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(d)
        }))
    }

    fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
    }

    proptest! {
        #[test]
        fn add_increments_pending_only(
            text in "[a-zA-Z][a-zA-Z ]{0,20}",
            priority in arb_priority(),
            deadline in arb_deadline(),
            completed_first in 0usize..3,
        ) {
            let mut store = TaskStore::new();
            for i in 0..completed_first {
                let id = add(&mut store, &format!("done {}", i), None);
                store.complete(&id).unwrap();
            }
            let (pending, completed, total) =
                (store.pending_count(), store.completed_count(), store.len());

            store.add(&text, priority, deadline, now()).unwrap();

            prop_assert_eq!(store.pending_count(), pending + 1);
            prop_assert_eq!(store.completed_count(), completed);
            prop_assert_eq!(store.len(), total + 1);
        }

        #[test]
        fn complete_then_reopen_round_trips(
            text in "[a-zA-Z][a-zA-Z ]{0,20}",
            priority in arb_priority(),
            deadline in arb_deadline(),
        ) {
            let mut store = TaskStore::new();
            let before = store.add(&text, priority, deadline, now()).unwrap().clone();

            store.complete(&before.id).unwrap();
            store.reopen(&before.id).unwrap();

            prop_assert_eq!(store.pending(), std::slice::from_ref(&before));
            prop_assert_eq!(store.completed_count(), 0);
        }

        #[test]
        fn sort_orders_dated_then_undated(deadlines in proptest::collection::vec(arb_deadline(), 0..20)) {
            let mut store = TaskStore::new();
            for (i, d) in deadlines.iter().enumerate() {
                add(&mut store, &format!("t{}", i), *d);
            }

            store.sort_pending_by_deadline();
            let sorted = store.pending();

            for pair in sorted.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                match (a.deadline, b.deadline) {
                    (Some(x), Some(y)) => {
                        prop_assert!(x <= y);
                        if x == y {
                            let ia: usize = a.text[1..].parse().unwrap();
                            let ib: usize = b.text[1..].parse().unwrap();
                            prop_assert!(ia < ib);
                        }
                    }
                    (None, Some(_)) => prop_assert!(false, "undated before dated"),
                    (None, None) => {
                        let ia: usize = a.text[1..].parse().unwrap();
                        let ib: usize = b.text[1..].parse().unwrap();
                        prop_assert!(ia < ib);
                    }
                    (Some(_), None) => {}
                }
            }
            prop_assert_eq!(sorted.len(), deadlines.len());
        }
    }
}
