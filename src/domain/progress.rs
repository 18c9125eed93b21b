//! Completion progress

/// Percentage of tasks completed, in `[0, 100]`. Zero when there are no tasks.
pub fn progress(pending: usize, completed: usize) -> f64 {
    let total = pending + completed;
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}
