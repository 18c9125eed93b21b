//! Deadline urgency classification
//!
//! Urgency is never stored on a task. It is recomputed against the current
//! time whenever a view is built, so a task drifts from `Normal` to `Close`
//! to `Overdue` on its own as the clock advances.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default window, in days, inside which a deadline counts as close
pub const DEFAULT_CLOSE_THRESHOLD_DAYS: f64 = 2.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Urgency bucket of a deadline relative to now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    None,
    Overdue,
    Close,
    Normal,
}

impl Urgency {
    /// Decoration tag shown next to a pending task, if any
    pub fn decoration(&self) -> Option<&'static str> {
        match self {
            Urgency::None | Urgency::Normal => None,
            Urgency::Close => Some("close-to-deadline"),
            Urgency::Overdue => Some("overdue"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::None => "none",
            Urgency::Overdue => "overdue",
            Urgency::Close => "close",
            Urgency::Normal => "normal",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("close threshold must be a non-negative number of days, got {0}")]
pub struct ThresholdError(pub f64);

/// Classifies deadlines against a configurable "close" window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadlineClassifier {
    threshold_days: f64,
}

impl Default for DeadlineClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSE_THRESHOLD_DAYS)
    }
}

impl DeadlineClassifier {
    pub fn new(threshold_days: f64) -> Self {
        Self { threshold_days }
    }

    /// Builds a classifier from untrusted input; the window must be finite
    /// and non-negative
    pub fn try_new(threshold_days: f64) -> Result<Self, ThresholdError> {
        if !threshold_days.is_finite() || threshold_days < 0.0 {
            return Err(ThresholdError(threshold_days));
        }
        Ok(Self::new(threshold_days))
    }

    pub fn threshold_days(&self) -> f64 {
        self.threshold_days
    }

    /// Classifies a calendar-date deadline (midnight UTC of that day)
    pub fn classify(&self, deadline: Option<NaiveDate>, now: DateTime<Utc>) -> Urgency {
        self.classify_instant(deadline.map(|d| d.and_time(NaiveTime::MIN).and_utc()), now)
    }

    /// Classifies an exact deadline instant
    pub fn classify_instant(
        &self,
        deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Urgency {
        let Some(deadline) = deadline else {
            return Urgency::None;
        };

        if deadline < now {
            return Urgency::Overdue;
        }

        let delta = deadline - now;
        let days = delta.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY;
        if days <= self.threshold_days {
            Urgency::Close
        } else {
            Urgency::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn absent_deadline_is_none() {
        let c = DeadlineClassifier::default();
        assert_eq!(c.classify_instant(None, now()), Urgency::None);
        assert_eq!(c.classify(None, now()), Urgency::None);
    }

    #[test]
    fn past_deadline_is_overdue() {
        let c = DeadlineClassifier::default();
        assert_eq!(
            c.classify_instant(Some(now() - Duration::days(1)), now()),
            Urgency::Overdue
        );
    }

    #[test]
    fn one_hour_away_is_close() {
        let c = DeadlineClassifier::default();
        assert_eq!(
            c.classify_instant(Some(now() + Duration::hours(1)), now()),
            Urgency::Close
        );
    }

    #[test]
    fn fractional_days_count() {
        let c = DeadlineClassifier::default();
        assert_eq!(
            c.classify_instant(Some(now() + Duration::hours(30)), now()),
            Urgency::Close
        );
        assert_eq!(
            c.classify_instant(Some(now() + Duration::hours(49)), now()),
            Urgency::Normal
        );
    }

    #[test]
    fn exactly_at_threshold_is_close() {
        let c = DeadlineClassifier::default();
        assert_eq!(
            c.classify_instant(Some(now() + Duration::days(2)), now()),
            Urgency::Close
        );
    }

    #[test]
    fn exactly_now_is_not_overdue() {
        let c = DeadlineClassifier::default();
        assert_eq!(c.classify_instant(Some(now()), now()), Urgency::Close);
    }

    #[test]
    fn ten_days_away_is_normal() {
        let c = DeadlineClassifier::default();
        assert_eq!(
            c.classify_instant(Some(now() + Duration::days(10)), now()),
            Urgency::Normal
        );
    }

    #[test]
    fn custom_threshold() {
        let c = DeadlineClassifier::new(0.5);
        assert_eq!(
            c.classify_instant(Some(now() + Duration::hours(13)), now()),
            Urgency::Normal
        );
        assert_eq!(
            c.classify_instant(Some(now() + Duration::hours(11)), now()),
            Urgency::Close
        );
    }

    #[test]
    fn calendar_date_today_is_overdue_after_midnight() {
        let c = DeadlineClassifier::default();
        let today = now().date_naive();
        assert_eq!(c.classify(Some(today), now()), Urgency::Overdue);
    }

    #[test]
    fn calendar_date_tomorrow_is_close() {
        let c = DeadlineClassifier::default();
        let tomorrow = now().date_naive().succ_opt().unwrap();
        assert_eq!(c.classify(Some(tomorrow), now()), Urgency::Close);
    }

    #[test]
    fn try_new_rejects_bad_windows() {
        assert!(DeadlineClassifier::try_new(0.0).is_ok());
        assert_eq!(DeadlineClassifier::try_new(0.5).unwrap().threshold_days(), 0.5);
        assert_eq!(DeadlineClassifier::try_new(-1.0), Err(ThresholdError(-1.0)));
        assert!(DeadlineClassifier::try_new(f64::NAN).is_err());
        assert!(DeadlineClassifier::try_new(f64::INFINITY).is_err());
    }

    #[test]
    fn decorations() {
        assert_eq!(Urgency::None.decoration(), None);
        assert_eq!(Urgency::Normal.decoration(), None);
        assert_eq!(Urgency::Close.decoration(), Some("close-to-deadline"));
        assert_eq!(Urgency::Overdue.decoration(), Some("overdue"));
    }
}
