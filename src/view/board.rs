//! Board view: the visible projection of the task store

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::Filter;
use crate::domain::{progress, DeadlineClassifier, Priority, Task, TaskId, TaskStore, Urgency};

/// One rendered task row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskItem {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub badge: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub deadline_text: String,
    /// Only set for pending tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoration: Option<&'static str>,
    pub completed: bool,
}

impl TaskItem {
    fn pending(task: &Task, urgency: Urgency) -> Self {
        Self {
            urgency: Some(urgency),
            decoration: urgency.decoration(),
            ..Self::completed(task)
        }
    }

    fn completed(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            text: task.text.clone(),
            priority: task.priority,
            badge: task.priority.label(),
            deadline: task.deadline,
            deadline_text: task.deadline_text(),
            urgency: None,
            decoration: None,
            completed: task.completed,
        }
    }

    fn write_line(&self, out: &mut String) {
        let check = if self.completed { "[x]" } else { "[ ]" };
        let _ = write!(
            out,
            "  {} {}  {}  [{}]  {}",
            check, self.id, self.text, self.badge, self.deadline_text
        );
        if let Some(decoration) = self.decoration {
            let _ = write!(out, "  ({})", decoration);
        }
        out.push('\n');
    }
}

/// Everything a display surface needs to draw the task list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub filter: Filter,
    /// Visible pending tasks, in store order
    pub pending: Vec<TaskItem>,
    /// Completed tasks, in store order; never filtered
    pub completed: Vec<TaskItem>,
    pub pending_total: usize,
    pub completed_total: usize,
    /// Percentage over the whole store, regardless of filter
    pub progress: f64,
    pub rendered_at: DateTime<Utc>,
}

impl BoardView {
    /// Projects the store through the filter, classifying deadlines against `now`
    pub fn render(
        store: &TaskStore,
        filter: Filter,
        classifier: &DeadlineClassifier,
        now: DateTime<Utc>,
    ) -> Self {
        let pending = store
            .pending()
            .iter()
            .filter(|t| filter.matches(t.priority))
            .map(|t| TaskItem::pending(t, classifier.classify(t.deadline, now)))
            .collect();

        let completed = store.completed().iter().map(TaskItem::completed).collect();

        Self {
            filter,
            pending,
            completed,
            pending_total: store.pending_count(),
            completed_total: store.completed_count(),
            progress: progress(store.pending_count(), store.completed_count()),
            rendered_at: now,
        }
    }

    /// Progress as a bar width, e.g. `50%` or `33.33%`
    pub fn progress_width(&self) -> String {
        let pct = (self.progress.clamp(0.0, 100.0) * 100.0).round() / 100.0;
        format!("{}%", pct)
    }

    /// Progress as a whole percentage for compact displays
    pub fn progress_percent(&self) -> u16 {
        self.progress.clamp(0.0, 100.0).round() as u16
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "Pending ({}/{}) [filter: {}]",
            self.pending.len(),
            self.pending_total,
            self.filter
        );
        if self.pending.is_empty() {
            out.push_str("  (none)\n");
        }
        for item in &self.pending {
            item.write_line(&mut out);
        }

        let _ = writeln!(out, "Completed ({})", self.completed.len());
        if self.completed.is_empty() {
            out.push_str("  (none)\n");
        }
        for item in &self.completed {
            item.write_line(&mut out);
        }

        let _ = writeln!(out, "Progress: {}%", self.progress_percent());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn date(s: &str) -> Option<NaiveDate> {
        Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    fn sample_store() -> TaskStore {
        let mut store = TaskStore::new();
        store.add("Low one", Priority::Low, None, now()).unwrap();
        store
            .add("High soon", Priority::High, date("2024-06-16"), now())
            .unwrap();
        store
            .add("High late", Priority::High, date("2024-07-30"), now())
            .unwrap();
        let done = store
            .add("Done low", Priority::Low, date("2024-01-01"), now())
            .unwrap()
            .id
            .clone();
        store.complete(&done).unwrap();
        store
    }

    fn render(store: &TaskStore, filter: Filter) -> BoardView {
        BoardView::render(store, filter, &DeadlineClassifier::default(), now())
    }

    #[test]
    fn renders_store_order_and_counts() {
        let view = render(&sample_store(), Filter::All);

        let labels: Vec<_> = view.pending.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(labels, vec!["Low one", "High soon", "High late"]);
        assert_eq!(view.completed.len(), 1);
        assert_eq!(view.pending_total, 3);
        assert_eq!(view.completed_total, 1);
        assert_eq!(view.progress, 25.0);
    }

    #[test]
    fn pending_items_carry_urgency() {
        let view = render(&sample_store(), Filter::All);

        assert_eq!(view.pending[0].urgency, Some(Urgency::None));
        assert_eq!(view.pending[0].decoration, None);
        assert_eq!(view.pending[1].urgency, Some(Urgency::Close));
        assert_eq!(view.pending[1].decoration, Some("close-to-deadline"));
        assert_eq!(view.pending[2].urgency, Some(Urgency::Normal));
        assert_eq!(view.pending[2].decoration, None);
    }

    #[test]
    fn completed_items_have_no_urgency() {
        let view = render(&sample_store(), Filter::All);
        let done = &view.completed[0];
        assert!(done.completed);
        assert_eq!(done.urgency, None);
        assert_eq!(done.decoration, None);
    }

    #[test]
    fn filter_hides_pending_only() {
        let store = sample_store();
        let view = render(&store, Filter::High);

        assert!(view.pending.iter().all(|i| i.priority == Priority::High));
        assert_eq!(view.pending.len(), 2);
        // Completed list is filter-exempt
        assert_eq!(view.completed.len(), 1);
        assert_eq!(view.completed[0].priority, Priority::Low);
        // Progress uses the whole store
        assert_eq!(view.progress, 25.0);
        assert_eq!(store.pending_count(), 3);
    }

    #[test]
    fn urgency_follows_now() {
        let store = sample_store();
        let classifier = DeadlineClassifier::default();
        let later = now() + chrono::Duration::days(2);
        let view = BoardView::render(&store, Filter::All, &classifier, later);
        assert_eq!(view.pending[1].urgency, Some(Urgency::Overdue));
    }

    #[test]
    fn badge_and_deadline_text() {
        let view = render(&sample_store(), Filter::All);
        assert_eq!(view.pending[0].badge, "Low");
        assert_eq!(view.pending[0].deadline_text, "No Deadline");
        assert_eq!(view.pending[1].badge, "High");
        assert_eq!(view.pending[1].deadline_text, "Due: 2024-06-16");
    }

    #[test]
    fn progress_width() {
        let view = render(&TaskStore::new(), Filter::All);
        assert_eq!(view.progress_width(), "0%");

        let view = render(&sample_store(), Filter::All);
        assert_eq!(view.progress_width(), "25%");

        let mut store = TaskStore::new();
        for text in ["a", "b", "c"] {
            store.add(text, Priority::Low, None, now()).unwrap();
        }
        let id = store.pending()[0].id.clone();
        store.complete(&id).unwrap();
        let view = render(&store, Filter::All);
        assert_eq!(view.progress_width(), "33.33%");
    }

    #[test]
    fn text_rendering() {
        let view = render(&sample_store(), Filter::Low);
        let text = view.to_text();

        assert!(text.starts_with("Pending (1/3) [filter: low]\n"));
        assert!(text.contains("[ ] "));
        assert!(text.contains("Low one  [Low]  No Deadline"));
        assert!(text.contains("Completed (1)\n"));
        assert!(text.contains("[x] "));
        assert!(text.ends_with("Progress: 25%\n"));
    }

    #[test]
    fn text_rendering_empty() {
        let text = render(&TaskStore::new(), Filter::All).to_text();
        assert_eq!(
            text,
            "Pending (0/0) [filter: all]\n  (none)\nCompleted (0)\n  (none)\nProgress: 0%\n"
        );
    }

    #[test]
    fn json_rendering() {
        let view = render(&sample_store(), Filter::All);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["filter"], "all");
        assert_eq!(json["progress"], 25.0);
        assert_eq!(json["pending"][1]["urgency"], "close");
        assert_eq!(json["pending"][1]["decoration"], "close-to-deadline");
        assert!(json["completed"][0].get("urgency").is_none());
    }
}
